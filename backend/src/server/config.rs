//! Server settings and the resolved server configuration.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use pagination::{PageError, PageSize};
use serde::Deserialize;

use crate::inbound::http::state::NEWS_COUNT_ON_HOME_PAGE;
use crate::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Which application the server hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Site {
    /// Personal notes.
    #[default]
    Notes,
    /// Public news with comments.
    News,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Notes => "notes",
            Self::News => "news",
        })
    }
}

/// Settings that failed to resolve.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `site` named neither application.
    #[error("unknown site '{0}'; expected notes or news")]
    UnknownSite(String),
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Offending value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// `news_per_page` is zero or too large.
    #[error("invalid news page size: {0}")]
    PageSize(#[from] PageError),
}

impl FromStr for Site {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "notes" => Ok(Self::Notes),
            "news" => Ok(Self::News),
            _ => Err(SettingsError::UnknownSite(value.to_owned())),
        }
    }
}

/// Server settings from the command line, `YA_*` environment variables and
/// configuration files.
///
/// | Field | Variable | Default |
/// |---|---|---|
/// | `site` | `YA_SITE` | `notes` |
/// | `bind_addr` | `YA_BIND_ADDR` | `0.0.0.0:8080` |
/// | `database_url` | `YA_DATABASE_URL` | unset: in-memory store |
/// | `news_per_page` | `YA_NEWS_PER_PAGE` | `10` |
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YA")]
pub struct ServerSettings {
    /// `notes` or `news`.
    pub site: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Items per page on the news home listing.
    pub news_per_page: Option<usize>,
}

impl ServerSettings {
    /// Hosted application.
    pub fn site(&self) -> Result<Site, SettingsError> {
        self.site.as_deref().map_or(Ok(Site::default()), str::parse)
    }

    /// Listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Validated news page size.
    pub fn news_per_page(&self) -> Result<PageSize, SettingsError> {
        Ok(PageSize::new(
            self.news_per_page.unwrap_or(NEWS_COUNT_ON_HOME_PAGE),
        )?)
    }
}

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) site: Site,
    pub(crate) news_per_page: PageSize,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Session settings plus listen address; the notes site with the default
    /// page size and in-memory storage.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            site: Site::default(),
            news_per_page: PageSize::DEFAULT,
            db_pool: None,
        }
    }

    /// Host `site`.
    #[must_use]
    pub fn with_site(mut self, site: Site) -> Self {
        self.site = site;
        self
    }

    /// List `size` items per news page.
    #[must_use]
    pub fn with_news_per_page(mut self, size: PageSize) -> Self {
        self.news_per_page = size;
        self
    }

    /// Store data in PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Listen address.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Hosted application.
    #[must_use]
    pub fn site(&self) -> Site {
        self.site
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 4] = [
        "YA_SITE",
        "YA_BIND_ADDR",
        "YA_DATABASE_URL",
        "YA_NEWS_PER_PAGE",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("ya-backend")]).expect("settings load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(settings.site().expect("site"), Site::Notes);
        assert_eq!(
            settings.bind_addr().expect("addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("default addr")
        );
        assert_eq!(
            settings.news_per_page().expect("size").get(),
            NEWS_COUNT_ON_HOME_PAGE
        );
        assert!(settings.database_url.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("YA_SITE", Some("News".to_owned())),
            ("YA_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("YA_DATABASE_URL", Some("postgres://localhost/ya".to_owned())),
            ("YA_NEWS_PER_PAGE", Some("5".to_owned())),
        ]);

        let settings = load();

        assert_eq!(settings.site().expect("site"), Site::News);
        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
        assert_eq!(settings.news_per_page().expect("size").get(), 5);
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/ya")
        );
    }

    #[rstest]
    #[case("blog")]
    #[case("")]
    fn unknown_sites_are_rejected(#[case] value: &str) {
        let settings = ServerSettings {
            site: Some(value.to_owned()),
            ..ServerSettings::default()
        };
        assert!(matches!(settings.site(), Err(SettingsError::UnknownSite(_))));
    }

    #[rstest]
    fn zero_page_size_is_rejected() {
        let settings = ServerSettings {
            news_per_page: Some(0),
            ..ServerSettings::default()
        };
        assert!(matches!(
            settings.news_per_page(),
            Err(SettingsError::PageSize(PageError::ZeroSize))
        ));
    }
}
