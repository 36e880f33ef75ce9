use std::io;

use clap::Parser;
use config::{Cli, Config};
use form::{FormController, SubmitOutcome};
use questions::{generate_question, record_attempt, Choice, Question};
use stats::StatsView;
use storage::{SqliteWordStore, WordStore};
use suggestion::{extract_text, Suggester};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utilities::{apply_entry, input, str_to_bool, CLEAR_ENTRY};
use validation::Schema;
use word::{PartOfSpeech, WordId};
use word_list::{Route, WordList};

mod config;
mod form;
mod notification;
mod questions;
mod stats;
mod storage;
mod utilities;
mod validation;
mod word;
mod word_list;

const CHART_WIDTH: usize = 40;
const QUIZ_LENGTH: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    init_tracing(&config.log_filter);

    let storage = SqliteWordStore::open(&config.database_url).await?;
    let suggester = match config.suggestion.backend() {
        Ok(backend) => Some(Suggester::new(backend)),
        Err(error) => {
            tracing::info!(%error, "suggestions disabled");
            None
        }
    };
    let mut list = WordList::new(&storage);

    print_help();
    loop {
        let Some(line) = input(">> ")? else {
            break;
        };
        let mut command_parts = line.split_ascii_whitespace();
        if let Some(command) = command_parts.next() {
            match command {
                "exit" | "leave" | "quit" | "e" | "q" | "l" => {
                    break;
                }
                "help" | "h" | "?" => print_help(),
                "delete" | "remove" => match command_parts.next().map(str::parse::<WordId>) {
                    Some(Ok(id)) => delete_word(&mut list, id).await?,
                    _ => println!("Usage: delete <id>"),
                },
                other => {
                    let path = std::iter::once(other)
                        .chain(command_parts)
                        .collect::<Vec<&str>>()
                        .join("/");
                    match path.parse::<Route>() {
                        Ok(route) => {
                            open_route(route, &storage, &mut list, &config, suggester.as_ref())
                                .await?
                        }
                        Err(_) => println!("Unknown command {command}."),
                    }
                }
            }
        }
    }
    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_help() {
    println!("Commands:");
    println!("  add                 add a new word");
    println!("  update <id>         edit a word");
    println!("  list                show every word");
    println!("  delete <id>         delete a word");
    println!("  stats               words added and updated per day");
    println!("  suggest             ask for five new words based on your list");
    println!("  quiz                practice your words");
    println!("  exit                leave");
}

async fn open_route(
    route: Route,
    storage: &dyn WordStore,
    list: &mut WordList<'_>,
    config: &Config,
    suggester: Option<&Suggester>,
) -> io::Result<()> {
    match route {
        Route::Add => {
            let mut form = FormController::create(storage).with_schema(config.schema);
            fill_form(&mut form, config.schema).await?;
        }
        Route::Update(id) => {
            let mut form = FormController::update(storage, id).with_schema(config.schema);
            form.load().await;
            fill_form(&mut form, config.schema).await?;
        }
        Route::List => {
            list.load().await;
            print!("{list}");
        }
        Route::Stats => {
            let view = StatsView::load(storage).await;
            print!("{}", view.chart(CHART_WIDTH));
        }
        Route::Suggestions => suggest(storage, suggester).await,
        Route::Quiz => practice(storage).await?,
    }
    Ok(())
}

async fn delete_word(list: &mut WordList<'_>, id: WordId) -> io::Result<()> {
    let Some(answer) = input(&format!("Delete word {id}? (y/N): "))? else {
        return Ok(());
    };
    if !str_to_bool(answer).unwrap_or(false) {
        return Ok(());
    }
    if list.delete(id).await {
        println!("Deleted the word successfully.");
    } else if let Some(error) = list.error() {
        println!("{error}");
    }
    Ok(())
}

/// Prompts for one field and applies the line with [`apply_entry`]. `false` at end of input.
fn prompt_field(label: &str, value: &mut String) -> io::Result<bool> {
    let prompt = if value.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{value}]: ")
    };
    let Some(line) = input(&prompt)? else {
        return Ok(false);
    };
    apply_entry(value, &line);
    Ok(true)
}

async fn fill_form(form: &mut FormController<'_>, schema: Schema) -> io::Result<()> {
    println!(
        "{} a word (leave a line empty to keep its value, {CLEAR_ENTRY} to clear it)",
        capitalize(form.mode().verb())
    );
    loop {
        let fields = form.fields_mut();
        let complete = prompt_field("vocabulary", &mut fields.vocabulary)?
            && prompt_field("meaning", &mut fields.meaning)?
            && prompt_field("translate", &mut fields.translate)?
            && prompt_field("example sentence", &mut fields.example_sentence)?
            && prompt_field("category", &mut fields.category)?;
        if !complete {
            return Ok(());
        }
        if schema.require_part_of_speech {
            let options = PartOfSpeech::ALL
                .iter()
                .map(|pos| pos.label())
                .collect::<Vec<&str>>()
                .join(", ");
            println!("  options: {options}");
            let prompt = format!(
                "part of speech, comma separated, listed ones are toggled [{}]: ",
                fields.part_of_speech
            );
            let Some(line) = input(&prompt)? else {
                return Ok(());
            };
            for name in line.split(',').filter(|name| !name.trim().is_empty()) {
                match name.parse::<PartOfSpeech>() {
                    Ok(pos) => {
                        fields.part_of_speech.toggle(pos);
                    }
                    Err(error) => println!("  {error}"),
                }
            }
        }

        match form.submit().await {
            SubmitOutcome::Saved(notification) | SubmitOutcome::Failed(notification) => {
                println!("{notification}");
                return Ok(());
            }
            SubmitOutcome::MissingTarget => {
                println!("There is no word to update.");
                return Ok(());
            }
            SubmitOutcome::Rejected(errors) => {
                for error in &errors.0 {
                    println!("  {}: {}", error.field, error.message);
                }
                let Some(again) = input("Fix the form? (Y/n): ")? else {
                    return Ok(());
                };
                if !str_to_bool(again).unwrap_or(true) {
                    return Ok(());
                }
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn suggest(storage: &dyn WordStore, suggester: Option<&Suggester>) {
    let Some(suggester) = suggester else {
        println!("Suggestions need ANTHROPIC_API_KEY or a [suggestion] endpoint in the settings file.");
        return;
    };
    let words = match storage.list().await {
        Ok(words) => words,
        Err(error) => {
            println!("Error: {error}");
            return;
        }
    };
    println!("Asking for suggestions based on {} words...", words.len());
    match suggester.suggest(&words).await {
        Ok(response) => match extract_text(&response) {
            Some(text) => println!("{text}"),
            None => println!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            ),
        },
        Err(error) => {
            tracing::warn!(%error, "suggestion request failed");
            println!("Failed to get suggestions: {error}");
        }
    }
}

async fn practice(storage: &dyn WordStore) -> io::Result<()> {
    let words = match storage.list().await {
        Ok(words) => words,
        Err(error) => {
            println!("Error: {error}");
            return Ok(());
        }
    };
    for index in 0..QUIZ_LENGTH {
        let Some(question) = generate_question(&words, &mut rand::thread_rng()) else {
            println!("Add at least two different words to practice.");
            break;
        };
        if index != 0 {
            println!("----------------------------------------");
        }
        let Some(choice) = ask_question(&question)? else {
            break;
        };
        if let Err(error) = record_attempt(storage, &question, choice).await {
            tracing::warn!(id = question.word_id, %error, "failed to record quiz");
        }
    }
    Ok(())
}

/// `None` at end of input.
fn ask_question(question: &Question) -> io::Result<Option<Choice<'_>>> {
    println!("{}", question.question);
    for (index, answer) in question.answers.iter().enumerate() {
        println!("[{}]: {}", index + 1, answer.content);
    }
    let choice = loop {
        let Some(chosen_answer) = input("Enter the correct answer: ")? else {
            return Ok(None);
        };
        match question.interpret(&chosen_answer) {
            Choice::Unclear => println!("Couldn't understand your answer, please try again."),
            choice => break choice,
        }
    };
    if let Choice::Picked(answer) = choice {
        if answer.correct {
            println!("The answer is correct. Well done!");
        } else {
            println!(
                "The answer is incorrect. The right answer is {}.",
                question
                    .correct_answer()
                    .map(|answer| &answer.content[..])
                    .unwrap_or("unknown")
            );
        }
    }
    Ok(Some(choice))
}
