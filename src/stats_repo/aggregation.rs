// Report dimensions: grouping key -> grouped-count SQL.
// DB access (running the queries) stays in stats_repo::mod.

/// Grouping key accepted by GET /report?column=. Keys are case-sensitive and
/// match the wire/schema column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    PlatformName,
    BrowserClientName,
    /// Browser name and version joined with a single space.
    BrowserClient,
    /// Screen width and height joined with 'x'.
    ScreenResolution,
    UserRegion,
    UserProvider,
}

impl Dimension {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "platformName" => Some(Self::PlatformName),
            "browserClientName" => Some(Self::BrowserClientName),
            "browserClient" => Some(Self::BrowserClient),
            "screenData_resolution" => Some(Self::ScreenResolution),
            "userRegion" => Some(Self::UserRegion),
            "userProvider" => Some(Self::UserProvider),
            _ => None,
        }
    }

    pub(crate) fn group_sql(&self) -> &'static str {
        match self {
            Self::PlatformName => {
                r#"SELECT "platformName" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
            Self::BrowserClientName => {
                r#"SELECT "browserClientName" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
            Self::BrowserClient => {
                r#"SELECT "browserClientName" || ' ' || "browserClientVersion" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
            Self::ScreenResolution => {
                r#"SELECT "screenData_resolutionX" || 'x' || "screenData_resolutionY" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
            Self::UserRegion => {
                r#"SELECT "userRegion" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
            Self::UserProvider => {
                r#"SELECT "userProvider" AS label, count(*) AS cnt FROM stats GROUP BY label"#
            }
        }
    }
}

/// Filter-by-value report forms: restrict rows to one name, group by version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteredDimension {
    /// ?platformName=<v>: rows with that platform, grouped by platformVersion.
    PlatformVersionByName,
    /// ?browserClientName=<v>: rows with that browser, grouped by browserClientVersion.
    BrowserClientVersionByName,
}

impl FilteredDimension {
    pub(crate) fn group_sql(&self) -> &'static str {
        match self {
            Self::PlatformVersionByName => {
                r#"SELECT "platformVersion" AS label, count(*) AS cnt FROM stats WHERE "platformName" = $1 GROUP BY label"#
            }
            Self::BrowserClientVersionByName => {
                r#"SELECT "browserClientVersion" AS label, count(*) AS cnt FROM stats WHERE "browserClientName" = $1 GROUP BY label"#
            }
        }
    }
}
