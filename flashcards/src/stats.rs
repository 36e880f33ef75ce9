use std::fmt;

use crate::storage::WordStore;
use crate::word::DateStat;

const BAR: char = '█';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Add,
    Update,
    Quiz,
}

impl Series {
    fn label(self) -> &'static str {
        match self {
            Series::Add => "words added",
            Series::Update => "words updated",
            Series::Quiz => "quizzes taken",
        }
    }

    fn value(self, stat: &DateStat) -> i64 {
        match self {
            Series::Add => stat.add,
            Series::Update => stat.update,
            Series::Quiz => stat.quiz.unwrap_or(0),
        }
    }
}

/// Per-day activity, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsView {
    stats: Vec<DateStat>,
}

impl StatsView {
    pub fn new(mut stats: Vec<DateStat>) -> Self {
        stats.sort_by_key(|stat| stat.date);
        Self { stats }
    }

    /// A failed fetch is logged and yields an empty chart.
    pub async fn load(store: &dyn WordStore) -> Self {
        match store.stats_by_date().await {
            Ok(stats) => Self::new(stats),
            Err(error) => {
                tracing::warn!(%error, "failed to load statistics");
                Self::default()
            }
        }
    }

    pub fn stats(&self) -> &[DateStat] {
        &self.stats
    }

    pub fn has_quiz_series(&self) -> bool {
        self.stats.iter().any(|stat| stat.quiz.is_some())
    }

    pub fn series(&self) -> Vec<Series> {
        let mut series = vec![Series::Add, Series::Update];
        if self.has_quiz_series() {
            series.push(Series::Quiz);
        }
        series
    }

    /// One group of bars per day, scaled so the largest value spans `width` cells.
    pub fn chart(&self, width: usize) -> Chart<'_> {
        Chart { view: self, width }
    }
}

pub struct Chart<'v> {
    view: &'v StatsView,
    width: usize,
}

impl fmt::Display for Chart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Word activity")?;
        let stats = &self.view.stats;
        if stats.is_empty() {
            return writeln!(f, "No activity recorded yet.");
        }
        let series = self.view.series();
        let max = stats
            .iter()
            .flat_map(|stat| series.iter().map(move |s| s.value(stat)))
            .max()
            .unwrap_or(0)
            .max(1) as usize;
        let label_width = series
            .iter()
            .map(|s| s.label().len())
            .max()
            .unwrap_or(0);

        for stat in stats {
            writeln!(f, "{}", stat.date.format("%Y-%m-%d"))?;
            for s in &series {
                let value = s.value(stat).max(0);
                let cells = (value as usize * self.width + max / 2) / max;
                writeln!(
                    f,
                    "  {:<label_width$} {} {value}",
                    s.label(),
                    BAR.to_string().repeat(cells),
                )?;
            }
        }
        Ok(())
    }
}
