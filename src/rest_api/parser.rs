//! # Query Parameter Parser
//!
//! Parses beer listing query parameters and path ids.

use std::collections::HashMap;
use std::str::FromStr;

use crate::store::query::{BeerQuery, MAX_LIMIT, MAX_PAGE};

use super::errors::{RestError, RestResult};

impl BeerQuery {
    /// Parse `page`, `limit`, `name`, `price` and `brewery_id`.
    ///
    /// Unknown keys are ignored; empty values count as absent.
    pub fn parse(params: &HashMap<String, String>) -> RestResult<Self> {
        let mut query = BeerQuery::default();

        for (key, value) in params {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                "page" => query.page = parse_positive(key, value)?,
                "limit" => query.limit = parse_positive(key, value)?,
                "name" => query.name = Some(value.to_string()),
                "price" => {
                    let price: f64 = parse_value(key, value)?;
                    if !price.is_finite() || price < 0.0 {
                        return Err(RestError::InvalidQueryParam(format!(
                            "price must be a non-negative number, got '{}'",
                            value
                        )));
                    }
                    query.max_price = Some(price);
                }
                "brewery_id" => query.brewery_id = Some(parse_value(key, value)?),
                _ => {}
            }
        }

        if query.limit > MAX_LIMIT {
            return Err(RestError::InvalidQueryParam(format!(
                "limit {} exceeds maximum {}",
                query.limit, MAX_LIMIT
            )));
        }

        if query.page > MAX_PAGE {
            return Err(RestError::InvalidQueryParam(format!(
                "page {} exceeds maximum {}",
                query.page, MAX_PAGE
            )));
        }

        Ok(query)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> RestResult<T> {
    value
        .parse()
        .map_err(|_| RestError::InvalidQueryParam(format!("{}: '{}'", key, value)))
}

fn parse_positive(key: &str, value: &str) -> RestResult<usize> {
    match parse_value::<usize>(key, value)? {
        0 => Err(RestError::InvalidQueryParam(format!(
            "{} must be at least 1",
            key
        ))),
        n => Ok(n),
    }
}

/// Parse a record id from a path segment
pub fn parse_id(raw: &str) -> RestResult<u64> {
    raw.parse()
        .map_err(|_| RestError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let query = BeerQuery::parse(&HashMap::new()).unwrap();
        assert_eq!(query, BeerQuery::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_all_filters() {
        let query = BeerQuery::parse(&params(&[
            ("page", "2"),
            ("limit", "5"),
            ("name", "ipa"),
            ("price", "6.5"),
            ("brewery_id", "3"),
        ]))
        .unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 5);
        assert_eq!(query.name.as_deref(), Some("ipa"));
        assert_eq!(query.max_price, Some(6.5));
        assert_eq!(query.brewery_id, Some(3));
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(BeerQuery::parse(&params(&[("page", "abc")])).is_err());
        assert!(BeerQuery::parse(&params(&[("page", "0")])).is_err());
        assert!(BeerQuery::parse(&params(&[("price", "-1")])).is_err());
        assert!(BeerQuery::parse(&params(&[("limit", "1000")])).is_err());
        assert!(BeerQuery::parse(&params(&[("page", "18446744073709551615")])).is_err());
    }

    #[test]
    fn test_page_limit_boundary() {
        let max = MAX_PAGE.to_string();
        let query = BeerQuery::parse(&params(&[("page", max.as_str())])).unwrap();
        assert_eq!(query.page, MAX_PAGE);

        let over = (MAX_PAGE + 1).to_string();
        assert!(matches!(
            BeerQuery::parse(&params(&[("page", over.as_str())])),
            Err(RestError::InvalidQueryParam(_))
        ));
    }

    #[test]
    fn test_empty_values_ignored() {
        let query = BeerQuery::parse(&params(&[("name", ""), ("price", " ")])).unwrap();
        assert_eq!(query.name, None);
        assert_eq!(query.max_price, None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("4x"), Err(RestError::InvalidId(_))));
        assert!(parse_id("-1").is_err());
    }
}
