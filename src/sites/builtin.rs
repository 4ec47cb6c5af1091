use crate::errors::SiteFeedResult;
use crate::sites::profile::{DateStrategy, SelectorRules, SiteProfile, UrlStrategy};

/// Profiles shipped with the binary.
pub fn builtin_profiles() -> SiteFeedResult<Vec<SiteProfile>> {
    Ok(vec![a16z()?, techcrunch()?])
}

fn a16z() -> SiteFeedResult<SiteProfile> {
    let rules = SelectorRules::new(
        r#"article, .article-card, .card, .post, [data-testid*="post"], .content-item, .feed-item"#,
        r#"h1, h2, h3, h4, .title, .headline, [class*="title"], [class*="headline"], [data-testid*="title"]"#,
        r#"p, .excerpt, .summary, .description, [class*="excerpt"], [class*="description"], [class*="summary"]"#,
        "a",
    )?
    .with_date(r#"time, .date, .published, [class*="date"], [class*="time"], [datetime]"#)?
    .with_author(r#".author, .byline, [class*="author"], [class*="byline"]"#)?;

    Ok(SiteProfile::new(
        "a16z.com".to_string(),
        "Andreessen Horowitz".to_string(),
        "https://a16z.com".to_string(),
        "News and insights from Andreessen Horowitz".to_string(),
        rules,
    )
    .with_scrape_url(Some("https://a16z.com/news-content/".to_string()))
    .with_url_strategy(UrlStrategy::AbsolutizeRelative)
    .with_date_strategy(DateStrategy::StandardParse))
}

fn techcrunch() -> SiteFeedResult<SiteProfile> {
    let rules = SelectorRules::new(
        ".post-block, article",
        ".post-block__title a, h2 a, h3 a",
        ".post-block__content, .excerpt",
        ".post-block__title a, h2 a, h3 a",
    )?
    .with_date(".post-block__meta time, time")?
    .with_author(".post-block__meta .author, .author")?;

    Ok(SiteProfile::new(
        "techcrunch.com".to_string(),
        "TechCrunch".to_string(),
        "https://techcrunch.com".to_string(),
        "Startup and technology news".to_string(),
        rules,
    )
    .with_scrape_url(Some("https://techcrunch.com/".to_string()))
    .with_date_strategy(DateStrategy::StandardParse))
}
