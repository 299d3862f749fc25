//! Translation of raw list query parameters into a typed [`QueryDescription`].
//!
//! Everything here is pure: no I/O and no logging.

use crate::error::{TodoError, TodoResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::IntoParams;

/// Raw list parameters as they arrive on the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Field to sort by (id, description, status, created_at, updated_at)
    #[serde(rename = "orderBy", default)]
    pub order_by: Option<String>,
    /// Sort direction; only "false" sorts descending
    #[serde(rename = "ASC", default)]
    pub asc: Option<String>,
    /// Exact status match
    #[serde(default)]
    pub status: Option<String>,
    /// Page size; absent or non-positive disables pagination
    #[serde(default)]
    pub limit: Option<String>,
    /// 1-based page number
    #[serde(default)]
    pub page: Option<String>,
}

impl ListParams {
    /// Build from raw query pairs; the first occurrence of a key wins and
    /// unknown keys are ignored
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "orderBy" => &mut params.order_by,
                "ASC" => &mut params.asc,
                "status" => &mut params.status,
                "limit" => &mut params.limit,
                "page" => &mut params.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortField {
    Id,
    Description,
    Status,
    #[strum(to_string = "created_at", serialize = "created")]
    CreatedAt,
    #[strum(to_string = "updated_at", serialize = "updated")]
    UpdatedAt,
}

/// Columns that accept an equality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FilterField {
    Status,
    Description,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// `None` leaves ordering to the identifier
    pub field: Option<SortField>,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: FilterField,
    pub value: String,
}

/// Conjunction of equality filters, in the order they were given
pub type FilterSpec = Vec<Filter>;

/// Largest limit or offset a SQL backend can bind (signed BIGINT)
pub const MAX_ROWS: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    /// `page` is 1-based; anything below 1 maps to the first page.
    /// Both values are clamped to [`MAX_ROWS`].
    pub fn from_page(limit: u64, page: Option<i64>) -> Self {
        let limit = limit.min(MAX_ROWS);
        let offset = match page {
            Some(page) if page > 1 => ((page - 1) as u64).saturating_mul(limit).min(MAX_ROWS),
            _ => 0,
        };
        Self { limit, offset }
    }
}

/// Sort, filter and pagination for a single list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescription {
    pub sort: SortSpec,
    pub filter: FilterSpec,
    /// `None` returns every matching row
    pub pagination: Option<Pagination>,
}

impl QueryDescription {
    pub fn from_params(params: &ListParams) -> TodoResult<Self> {
        let field = match non_empty(params.order_by.as_deref()) {
            Some(raw) => Some(
                raw.parse::<SortField>()
                    .map_err(|_| TodoError::validation(format!("Unknown sort field: {}", raw)))?,
            ),
            None => None,
        };

        let descending = params
            .asc
            .as_deref()
            .is_some_and(|raw| raw == "false");

        let filter = non_empty(params.status.as_deref())
            .map(|status| Filter {
                field: FilterField::Status,
                value: status.to_string(),
            })
            .into_iter()
            .collect();

        let pagination = parse_number(params.limit.as_deref())
            .filter(|limit| *limit > 0)
            .map(|limit| Pagination::from_page(limit as u64, parse_number(params.page.as_deref())));

        Ok(Self {
            sort: SortSpec { field, descending },
            filter,
            pagination,
        })
    }
}

/// Free-function form of [`QueryDescription::from_params`]
pub fn aggregate(params: &ListParams) -> TodoResult<QueryDescription> {
    QueryDescription::from_params(params)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// Malformed numbers count as absent
fn parse_number(raw: Option<&str>) -> Option<i64> {
    non_empty(raw).and_then(|s| s.parse::<i64>().ok())
}
