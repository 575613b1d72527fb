//! Explicit settings of the truncate stage.
//!
//! Nothing inside the engine reads the environment, the composition root may
//! call [`TruncateSettings::with_env_override`] once before wiring things up.

use log::warn;

use crate::{DocFreq, DEFAULT_TRUNCATE_THREAD_COUNT};

pub const TRUNCATE_THREAD_COUNT_ENV: &str = "TRUNCATE_THREAD_COUNT";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruncateSettings {
    thread_count: usize,
}

#[derive(Default)]
pub struct TruncateSettingsBuilder {
    thread_count: Option<usize>,
}

impl Default for TruncateSettings {
    fn default() -> Self {
        Self {
            thread_count: DEFAULT_TRUNCATE_THREAD_COUNT,
        }
    }
}

impl TruncateSettings {
    pub fn builder() -> TruncateSettingsBuilder {
        TruncateSettingsBuilder::default()
    }

    /// Requested worker count, validated when the scheduler is created.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Applies `TRUNCATE_THREAD_COUNT` if it is set to an integer.
    pub fn with_env_override(self) -> Self {
        let value = std::env::var(TRUNCATE_THREAD_COUNT_ENV).ok();
        self.with_override(value.as_deref())
    }

    fn with_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.trim().parse::<usize>() {
                Ok(thread_count) => self.thread_count = thread_count,
                Err(_) => warn!(
                    "ignoring {}={:?}, keeping thread count {}",
                    TRUNCATE_THREAD_COUNT_ENV, value, self.thread_count
                ),
            }
        }
        self
    }
}

impl TruncateSettingsBuilder {
    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = Some(thread_count);
        self
    }

    pub fn build(self) -> TruncateSettings {
        TruncateSettings {
            thread_count: self.thread_count.unwrap_or(DEFAULT_TRUNCATE_THREAD_COUNT),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

/// One truncation profile: terms with at least `df_threshold` documents keep
/// only their `limit` best documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruncateProfile {
    name: String,
    df_threshold: DocFreq,
    limit: usize,
    sort_order: SortOrder,
}

pub struct TruncateProfileBuilder {
    name: String,
    df_threshold: DocFreq,
    limit: usize,
    sort_order: SortOrder,
}

impl TruncateProfile {
    pub fn builder(name: impl Into<String>) -> TruncateProfileBuilder {
        TruncateProfileBuilder {
            name: name.into(),
            df_threshold: DocFreq::MAX,
            limit: 0,
            sort_order: SortOrder::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn df_threshold(&self) -> DocFreq {
        self.df_threshold
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

impl TruncateProfileBuilder {
    pub fn with_df_threshold(mut self, df_threshold: DocFreq) -> Self {
        self.df_threshold = df_threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn build(self) -> TruncateProfile {
        TruncateProfile {
            name: self.name,
            df_threshold: self.df_threshold,
            limit: self.limit,
            sort_order: self.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::DEFAULT_TRUNCATE_THREAD_COUNT;

    use super::{SortOrder, TruncateProfile, TruncateSettings};

    #[test]
    fn test_settings_builder() {
        assert_eq!(
            TruncateSettings::default().thread_count(),
            DEFAULT_TRUNCATE_THREAD_COUNT
        );
        assert_eq!(
            TruncateSettings::builder().build().thread_count(),
            DEFAULT_TRUNCATE_THREAD_COUNT
        );
        let settings = TruncateSettings::builder().with_thread_count(8).build();
        assert_eq!(settings.thread_count(), 8);
    }

    #[test]
    fn test_override() {
        let settings = TruncateSettings::builder().with_thread_count(8).build();
        assert_eq!(settings.clone().with_override(None).thread_count(), 8);
        assert_eq!(settings.clone().with_override(Some(" 4 ")).thread_count(), 4);
        assert_eq!(settings.clone().with_override(Some("four")).thread_count(), 8);
        assert_eq!(settings.with_override(Some("-2")).thread_count(), 8);
    }

    #[test]
    fn test_profile_builder() {
        let profile = TruncateProfile::builder("top_sales")
            .with_df_threshold(1000)
            .with_limit(100)
            .with_sort_order(SortOrder::Ascending)
            .build();
        assert_eq!(profile.name(), "top_sales");
        assert_eq!(profile.df_threshold(), 1000);
        assert_eq!(profile.limit(), 100);
        assert_eq!(profile.sort_order(), SortOrder::Ascending);
    }
}
