//! Collections and PostgREST query construction.

use std::fmt::Write as _;

/// Tables of the remote store used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Documents,
    Templates,
    TemplateSections,
    GeneratedParts,
}

impl Collection {
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Documents => "documents",
            Self::Templates => "templates_rapports",
            Self::TemplateSections => "templates_rapports_parts",
            Self::GeneratedParts => "generated_rapport_parts",
        }
    }
}

/// A PostgREST read query: column selection, filters, and one ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self::select("*")
    }
}

impl Query {
    #[must_use]
    pub fn select(columns: &str) -> Self {
        Self {
            select: columns.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// `column IN (values...)`.
    #[must_use]
    pub fn in_list(mut self, column: &str, values: &[String]) -> Self {
        let quoted = values
            .iter()
            .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        self.filters
            .push((column.to_string(), format!("in.({quoted})")));
        self
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.*{needle}*")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{dir}"));
        self
    }

    /// Render as a URL query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = format!("select={}", urlencoding::encode(&self.select));
        for (column, expr) in &self.filters {
            let _ = write!(
                out,
                "&{}={}",
                urlencoding::encode(column),
                urlencoding::encode(expr)
            );
        }
        if let Some(order) = &self.order {
            let _ = write!(out, "&order={}", urlencoding::encode(order));
        }
        out
    }

    /// Filter used by update and delete: `id = <id>`.
    #[must_use]
    pub(crate) fn by_id(id: &str) -> String {
        format!("id=eq.{}", urlencoding::encode(id))
    }
}
