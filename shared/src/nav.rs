use serde::Deserialize;
use url::form_urlencoded;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEndpoint {
    Next,
    Previous,
}

impl NavEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            NavEndpoint::Next => "load_next",
            NavEndpoint::Previous => "load_previous",
        }
    }
}

/// Where the current problem sits: its id, the list it was opened from and
/// the list's sort/filter state.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NavContext {
    pub problem_id: String,
    pub list_id: String,
    #[serde(default)]
    pub is_user_list: bool,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub is_ascending: Option<bool>,
    #[serde(default)]
    pub to_show: Option<String>,
}

impl NavContext {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// `load_next?list_id=..&is_user_list=..&id=..&scroll=..[&sort_by=..&is_ascending=..&to_show=..]`
pub fn navigation_path(endpoint: NavEndpoint, context: &NavContext, scroll_y: f64) -> String {
    let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("list_id", &context.list_id)
        .append_pair(
            "is_user_list",
            if context.is_user_list { "true" } else { "false" },
        )
        .append_pair("id", &context.problem_id)
        .append_pair("scroll", &format!("{scroll_y:.2}"));
    if let Some(sort_by) = &context.sort_by {
        query.append_pair("sort_by", sort_by);
    }
    if let Some(is_ascending) = context.is_ascending {
        // The server compares against Python's bool literals.
        query.append_pair("is_ascending", if is_ascending { "True" } else { "False" });
    }
    if let Some(to_show) = &context.to_show {
        query.append_pair("to_show", to_show);
    }
    format!("{}?{}", endpoint.path(), query.finish())
}
