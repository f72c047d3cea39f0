//! Affiliation + publication date query builder

/// Upper bound used when only a start date is given
pub const OPEN_ENDED_UPPER_BOUND: &str = "3000/12/31";

/// Builder for an institution search query
///
/// Every name variant becomes a quoted `[Affiliation]` clause; the clauses are
/// OR-combined and parenthesized. A publication date (`[dp]`) range is AND-ed on
/// when a start date is present.
#[derive(Debug, Clone, Default)]
pub struct AffiliationQuery {
    variants: Vec<String>,
    from_date: Option<String>,
    to_date: Option<String>,
}

impl AffiliationQuery {
    /// Create a query over the given affiliation name variants
    ///
    /// # Example
    ///
    /// ```
    /// use idmap_client::search::AffiliationQuery;
    ///
    /// let query = AffiliationQuery::new(["Example Hospital", "Example Medical Center"])
    ///     .date_range(Some("2024/01/01"), None::<&str>);
    ///
    /// assert_eq!(
    ///     query.build(),
    ///     "(\"Example Hospital\"[Affiliation] OR \"Example Medical Center\"[Affiliation]) AND 2024/01/01:3000/12/31[dp]"
    /// );
    /// ```
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
            from_date: None,
            to_date: None,
        }
    }

    /// Restrict by publication date (`YYYY/MM/DD`, passed through unvalidated)
    ///
    /// An end date without a start date has no effect on the query.
    pub fn date_range<F, T>(mut self, from_date: Option<F>, to_date: Option<T>) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.from_date = from_date.map(Into::into).filter(|d| !d.trim().is_empty());
        self.to_date = to_date.map(Into::into).filter(|d| !d.trim().is_empty());
        self
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn from_date(&self) -> Option<&str> {
        self.from_date.as_deref()
    }

    pub fn to_date(&self) -> Option<&str> {
        self.to_date.as_deref()
    }

    /// The `[dp]` clause, if a start date is set
    pub fn date_clause(&self) -> Option<String> {
        let from = self.from_date.as_deref()?;
        let to = self.to_date.as_deref().unwrap_or(OPEN_ENDED_UPPER_BOUND);
        Some(format!("{from}:{to}[dp]"))
    }

    /// Build the final query string
    pub fn build(&self) -> String {
        let affiliations = self
            .variants
            .iter()
            .map(|v| format!("\"{}\"[Affiliation]", v.replace('"', "")))
            .collect::<Vec<_>>()
            .join(" OR ");

        let query = format!("({affiliations})");

        match self.date_clause() {
            Some(dates) => format!("{query} AND {dates}"),
            None => query,
        }
    }
}
