//! Fluent, validated construction of search specs.
//!
//! Every dimension may be configured once. Configuring it again, or passing
//! an empty argument, fails immediately instead of silently overwriting.
//!
//! ```ignore
//! let spec = SearchBuilder::new(IndexKind::Uk)
//!     .search_for("bridge AND repair")?
//!     .filter_by_type(&[NoticeType::Tender])?
//!     .filter_by_published_range(PublishedRange::PastOneYear)?
//!     .exclude_currently_closed()?
//!     .build();
//! ```

use chrono::{DateTime, Utc};
use notiq_core::temporal::start_of_day;
use notiq_core::{
    Error, IndexKind, NoticeType, PublishedRange, QueryFieldSet, ResultOrder, Result, SearchField,
    SearchSpec,
};
use tokio_util::sync::CancellationToken;

use crate::service::SearchService;

/// Text query and the fields it targets.
#[derive(Debug, Clone, PartialEq)]
enum TextTarget {
    FieldSet(QueryFieldSet),
    Fields(Vec<SearchField>),
}

/// Single-use-per-dimension builder for a [`SearchSpec`].
#[derive(Debug, Clone)]
pub struct SearchBuilder {
    service: Option<SearchService>,
    index: IndexKind,
    text: Option<(String, TextTarget)>,
    types: Option<Vec<NoticeType>>,
    regions: Option<Vec<String>>,
    published_range: Option<PublishedRange>,
    exclude_currently_closed: bool,
    value: Option<(Option<f64>, Option<f64>)>,
    order_by: Option<ResultOrder>,
    page_size: Option<u32>,
}

impl SearchBuilder {
    /// Builder that only assembles specs.
    pub fn new(index: IndexKind) -> Self {
        Self {
            service: None,
            index,
            text: None,
            types: None,
            regions: None,
            published_range: None,
            exclude_currently_closed: false,
            value: None,
            order_by: None,
            page_size: None,
        }
    }

    /// Builder bound to a service, able to [`count`](Self::count).
    pub(crate) fn with_service(service: SearchService, index: IndexKind) -> Self {
        Self {
            service: Some(service),
            ..Self::new(index)
        }
    }

    /// Text query over the default field set.
    pub fn search_for(self, term: &str) -> Result<Self> {
        self.search_for_in_set(term, QueryFieldSet::Default)
    }

    /// Text query over a named field set.
    pub fn search_for_in_set(mut self, term: &str, field_set: QueryFieldSet) -> Result<Self> {
        let term = self.check_term(term)?;
        self.text = Some((term, TextTarget::FieldSet(field_set)));
        Ok(self)
    }

    /// Text query over explicit fields. Duplicate fields are collapsed.
    pub fn search_for_in_fields(mut self, term: &str, fields: &[SearchField]) -> Result<Self> {
        let term = self.check_term(term)?;
        if fields.is_empty() {
            return Err(Error::InvalidInput("At least one field is required".to_string()));
        }
        let mut unique: Vec<SearchField> = Vec::with_capacity(fields.len());
        for field in fields {
            if !unique.contains(field) {
                unique.push(*field);
            }
        }
        self.text = Some((term, TextTarget::Fields(unique)));
        Ok(self)
    }

    pub fn filter_by_type(mut self, types: &[NoticeType]) -> Result<Self> {
        if self.types.is_some() {
            return Err(Error::DimensionAlreadySet("filter_by_type"));
        }
        if types.is_empty() {
            return Err(Error::InvalidInput("At least one type is required".to_string()));
        }
        self.types = Some(types.to_vec());
        Ok(self)
    }

    /// Region filter. Blank codes are dropped.
    pub fn filter_by_region<S: AsRef<str>>(mut self, regions: &[S]) -> Result<Self> {
        if self.regions.is_some() {
            return Err(Error::DimensionAlreadySet("filter_by_region"));
        }
        if regions.is_empty() {
            return Err(Error::InvalidInput("At least one region is required".to_string()));
        }
        self.regions = Some(
            regions
                .iter()
                .map(AsRef::as_ref)
                .filter(|r| !r.trim().is_empty())
                .map(str::to_string)
                .collect(),
        );
        Ok(self)
    }

    /// Named publication window, resolved against the clock at build time.
    pub fn filter_by_published_range(mut self, range: PublishedRange) -> Result<Self> {
        if self.published_range.is_some() {
            return Err(Error::DimensionAlreadySet("filter_by_published_range"));
        }
        self.published_range = Some(range);
        Ok(self)
    }

    /// Only notices closing today or later.
    pub fn exclude_currently_closed(mut self) -> Result<Self> {
        if self.exclude_currently_closed {
            return Err(Error::DimensionAlreadySet("exclude_currently_closed"));
        }
        self.exclude_currently_closed = true;
        Ok(self)
    }

    /// Inclusive value range; one side may be open.
    pub fn filter_by_value(mut self, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        if self.value.is_some() {
            return Err(Error::DimensionAlreadySet("filter_by_value"));
        }
        if min.is_none() && max.is_none() {
            return Err(Error::InvalidInput(
                "At least one of min/max must be provided".to_string(),
            ));
        }
        if min.into_iter().chain(max).any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput("Value bounds must be finite".to_string()));
        }
        self.value = Some((min, max));
        Ok(self)
    }

    pub fn order_by(mut self, order: ResultOrder) -> Result<Self> {
        if self.order_by.is_some() {
            return Err(Error::DimensionAlreadySet("order_by"));
        }
        self.order_by = Some(order);
        Ok(self)
    }

    pub fn page_size(mut self, page_size: u32) -> Result<Self> {
        if self.page_size.is_some() {
            return Err(Error::DimensionAlreadySet("page_size"));
        }
        if page_size == 0 {
            return Err(Error::InvalidInput("Page size must be > 0".to_string()));
        }
        self.page_size = Some(page_size);
        Ok(self)
    }

    /// Assemble the spec, resolving relative dates against `now`.
    pub fn build_at(&self, now: DateTime<Utc>) -> SearchSpec {
        let (query, query_field_set, query_fields) = match &self.text {
            Some((term, TextTarget::FieldSet(set))) => (Some(term.clone()), Some(*set), None),
            Some((term, TextTarget::Fields(fields))) => {
                (Some(term.clone()), None, Some(fields.clone()))
            }
            None => (None, None, None),
        };

        let (published_from_utc, published_to_utc) = match self.published_range {
            Some(range) => {
                let (from, to) = range.to_boundaries(now);
                (Some(from), Some(to))
            }
            None => (None, None),
        };

        let (value_min, value_max) = self.value.unwrap_or((None, None));

        SearchSpec {
            index: self.index,
            query,
            query_field_set,
            query_fields,
            types: self.types.clone(),
            regions: self.regions.clone(),
            published_from_utc,
            published_to_utc,
            closing_on_or_after_utc: self.exclude_currently_closed.then(|| start_of_day(now)),
            value_min,
            value_max,
            order_by: self.order_by,
            page_size: self.page_size,
        }
    }

    /// Assemble the spec against the system clock.
    pub fn build(&self) -> SearchSpec {
        self.build_at(Utc::now())
    }

    /// Build the spec and count its matches.
    pub async fn count(&self, token: &CancellationToken) -> Result<u64> {
        let service = self.service.as_ref().ok_or_else(|| {
            Error::Config("search builder is not bound to a search service".to_string())
        })?;
        service.count(&self.build(), token).await
    }

    fn check_term(&self, term: &str) -> Result<String> {
        if self.text.is_some() {
            return Err(Error::DimensionAlreadySet("search_for"));
        }
        if term.trim().is_empty() {
            return Err(Error::InvalidInput("Term is required".to_string()));
        }
        Ok(term.to_string())
    }
}
