use url::Url;

use crate::app::Result;
use crate::config::RemoteConfig;

/// URL shapes of the feed and single-entity endpoints.
#[derive(Debug, Clone)]
pub struct Endpoints {
    feed_base: String,
    entity_base: String,
}

impl Endpoints {
    pub fn new(feed_base: impl Into<String>, entity_base: impl Into<String>) -> Self {
        Self {
            feed_base: feed_base.into().trim_end_matches('/').to_string(),
            entity_base: entity_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(remote: &RemoteConfig) -> Self {
        Self::new(remote.feed_base.as_str(), remote.entity_base.as_str())
    }

    /// `{feed_base}/{user}/activities?sync=1&limit={limit}[&from_timestamp={cursor}]`
    pub fn feed_url(&self, user_id: &str, limit: usize, cursor: Option<&str>) -> Result<String> {
        let mut url = Url::parse(&format!("{}/{}/activities", self.feed_base, user_id))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("sync", "1")
                .append_pair("limit", &limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("from_timestamp", cursor);
            }
        }
        Ok(url.into())
    }

    /// `{entity_base}/?urns=urn%3Aactivity%3A{id}&as_activities=0&export_user_counts=false`
    pub fn detail_url(&self, id: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}/", self.entity_base))?;
        url.query_pairs_mut()
            .append_pair("urns", &format!("urn:activity:{}", id))
            .append_pair("as_activities", "0")
            .append_pair("export_user_counts", "false");
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::from_config(&RemoteConfig::default())
    }

    #[test]
    fn test_first_feed_page_url() {
        assert_eq!(
            endpoints().feed_url("1197537175369949199", 150, None).unwrap(),
            "https://www.minds.com/api/v2/feeds/container/1197537175369949199/activities?sync=1&limit=150"
        );
    }

    #[test]
    fn test_feed_url_with_cursor() {
        assert_eq!(
            endpoints().feed_url("7", 150, Some("1600000000")).unwrap(),
            "https://www.minds.com/api/v2/feeds/container/7/activities?sync=1&limit=150&from_timestamp=1600000000"
        );
    }

    #[test]
    fn test_detail_url() {
        assert_eq!(
            endpoints().detail_url("123").unwrap(),
            "https://www.minds.com/api/v2/entities/?urns=urn%3Aactivity%3A123&as_activities=0&export_user_counts=false"
        );
    }

    #[test]
    fn test_trailing_slashes_are_normalized() {
        let endpoints = Endpoints::new("http://feed.test/base/", "http://entity.test/e/");
        assert_eq!(
            endpoints.feed_url("1", 2, None).unwrap(),
            "http://feed.test/base/1/activities?sync=1&limit=2"
        );
        assert_eq!(
            endpoints.detail_url("1").unwrap(),
            "http://entity.test/e/?urns=urn%3Aactivity%3A1&as_activities=0&export_user_counts=false"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(Endpoints::new("not a url", "also not").detail_url("1").is_err());
    }
}
