use indicatif::ProgressStyle;

const SPINNER_TEMPLATE: &str = "{spinner} {wide_msg}";
const FETCH_TEMPLATE: &str = "{spinner} {msg:30} {pos:>5} fetched";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn only_message() -> ProgressStyle {
        ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn fetch_counter() -> ProgressStyle {
        ProgressStyle::with_template(FETCH_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
