pub const DEFAULT_INPUT_FILE: &str = "input_links.xlsx";
pub const DEFAULT_URL_COLUMN: &str = "pdf";

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub path: String,       // Spreadsheet (.xlsx/.xls/.ods) or Parquet file
    pub url_column: String, // Column holding one document URL per row
    pub batch_size: Option<usize>, // Arrow batch size, Parquet only
}

impl InputConfig {
    pub fn new(path: impl Into<String>) -> Self {
        InputConfig {
            path: path.into(),
            url_column: DEFAULT_URL_COLUMN.to_string(),
            batch_size: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig::new(DEFAULT_INPUT_FILE)
    }
}
