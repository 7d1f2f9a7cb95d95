use serde::Serialize;

/// Ticker shown throughout the dashboard. Display only; nothing is fetched.
pub const SYMBOL: &str = "TSLA";

pub const DEFAULT_START_DATE: &str = "2023-01-01";
pub const DEFAULT_END_DATE: &str = "2024-01-01";
pub const DEFAULT_N_ESTIMATORS: &str = "100";
pub const DEFAULT_FOREST_MAX_DEPTH: &str = "10";
pub const DEFAULT_TREE_MAX_DEPTH: &str = "5";

/// Wall-clock delay of the simulated prediction run, in seconds.
pub const DEFAULT_RUN_DELAY_SECS: u64 = 3;

/// Sidebar column width when visible.
pub const SIDEBAR_WIDTH: u16 = 38;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceMode {
    Local,
    Upload,
    Fetch,
}

impl DataSourceMode {
    pub const ALL: [DataSourceMode; 3] = [Self::Local, Self::Upload, Self::Fetch];

    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "Use local CSV",
            Self::Upload => "Upload CSV",
            Self::Fetch => "Fetch from Yahoo Finance",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    Tree,
    Forest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::Linear, Self::Tree, Self::Forest];

    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear Regression",
            Self::Tree => "Decision Tree",
            Self::Forest => "Random Forest",
        }
    }
}

/// Hyperparameter fields. Values are free-form text, stored exactly as
/// typed; no bounds checking or numeric coercion happens anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperparamKey {
    NEstimators,
    MaxDepth,
}

impl HyperparamKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::NEstimators => "n_estimators",
            Self::MaxDepth => "max_depth",
        }
    }
}

/// Everything the sidebar edits. Ephemeral; lives only for the session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunConfig {
    pub data_source: DataSourceMode,
    pub start_date: String,
    pub end_date: String,
    /// Path picked in upload mode. Accepted, never read.
    pub upload_path: Option<String>,
    pub model: Option<ModelKind>,
    pub n_estimators: String,
    pub max_depth: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceMode::Fetch,
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
            upload_path: None,
            model: None,
            n_estimators: String::new(),
            max_depth: String::new(),
        }
    }
}

impl RunConfig {
    pub fn set_data_source(&mut self, mode: DataSourceMode) {
        self.data_source = mode;
    }

    /// Selecting a model re-seeds its hyperparameter fields with the
    /// default literals so the revealed inputs are never blank.
    pub fn set_model(&mut self, model: ModelKind) {
        self.model = Some(model);
        match model {
            ModelKind::Linear => {
                self.n_estimators.clear();
                self.max_depth.clear();
            }
            ModelKind::Tree => {
                self.n_estimators.clear();
                self.max_depth = DEFAULT_TREE_MAX_DEPTH.to_string();
            }
            ModelKind::Forest => {
                self.n_estimators = DEFAULT_N_ESTIMATORS.to_string();
                self.max_depth = DEFAULT_FOREST_MAX_DEPTH.to_string();
            }
        }
    }

    pub fn hyperparam_mut(&mut self, key: HyperparamKey) -> &mut String {
        match key {
            HyperparamKey::NEstimators => &mut self.n_estimators,
            HyperparamKey::MaxDepth => &mut self.max_depth,
        }
    }

    pub fn hyperparam(&self, key: HyperparamKey) -> &str {
        match key {
            HyperparamKey::NEstimators => &self.n_estimators,
            HyperparamKey::MaxDepth => &self.max_depth,
        }
    }

    /// Date-range inputs render only in fetch mode.
    pub fn shows_date_range(&self) -> bool {
        self.data_source == DataSourceMode::Fetch
    }

    /// The upload card renders only in upload mode.
    pub fn shows_upload(&self) -> bool {
        self.data_source == DataSourceMode::Upload
    }

    /// Hyperparameter fields rendered for the current model selection.
    pub fn hyperparam_fields(&self) -> &'static [HyperparamKey] {
        match self.model {
            Some(ModelKind::Forest) => &[HyperparamKey::NEstimators, HyperparamKey::MaxDepth],
            Some(ModelKind::Tree) => &[HyperparamKey::MaxDepth],
            Some(ModelKind::Linear) | None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_literals() {
        let config = RunConfig::default();
        assert_eq!(config.data_source, DataSourceMode::Fetch);
        assert_eq!(config.start_date, "2023-01-01");
        assert_eq!(config.end_date, "2024-01-01");
        assert_eq!(config.model, None);
        assert!(config.n_estimators.is_empty());
        assert!(config.max_depth.is_empty());
        assert!(config.upload_path.is_none());
    }

    #[test]
    fn test_data_source_controls_subfield_visibility() {
        let mut config = RunConfig::default();

        config.set_data_source(DataSourceMode::Upload);
        assert!(config.shows_upload());
        assert!(!config.shows_date_range());

        config.set_data_source(DataSourceMode::Fetch);
        assert!(!config.shows_upload());
        assert!(config.shows_date_range());

        config.set_data_source(DataSourceMode::Local);
        assert!(!config.shows_upload());
        assert!(!config.shows_date_range());
    }

    #[test]
    fn test_model_controls_hyperparam_fields() {
        let mut config = RunConfig::default();
        assert!(config.hyperparam_fields().is_empty());

        config.set_model(ModelKind::Forest);
        assert_eq!(
            config.hyperparam_fields(),
            &[HyperparamKey::NEstimators, HyperparamKey::MaxDepth]
        );
        assert_eq!(config.n_estimators, "100");
        assert_eq!(config.max_depth, "10");

        config.set_model(ModelKind::Tree);
        assert_eq!(config.hyperparam_fields(), &[HyperparamKey::MaxDepth]);
        assert_eq!(config.max_depth, "5");
        assert!(config.n_estimators.is_empty());

        config.set_model(ModelKind::Linear);
        assert!(config.hyperparam_fields().is_empty());
        assert!(config.max_depth.is_empty());
    }

    #[test]
    fn test_hyperparams_accept_free_form_text() {
        let mut config = RunConfig::default();
        config.set_model(ModelKind::Forest);
        let field = config.hyperparam_mut(HyperparamKey::NEstimators);
        field.clear();
        field.push_str("not-a-number");
        assert_eq!(config.n_estimators, "not-a-number");
    }
}
