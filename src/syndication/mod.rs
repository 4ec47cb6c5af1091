//! RSS 2.0 output for extracted articles.

use chrono::{DateTime, Datelike, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use url::Url;

use crate::domain::ScrapedArticle;
use crate::errors::{SiteFeedError, SiteFeedResult};
use crate::sites::SiteProfile;

pub const GENERATOR: &str = "sitefeed RSS converter";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Channel-level metadata of a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMeta {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub generator: String,
    pub last_updated: DateTime<Utc>,
    pub copyright: String,
    pub image: Option<String>,
}

impl ChannelMeta {
    pub fn for_site(profile: &SiteProfile, now: DateTime<Utc>) -> Self {
        let base = profile.base_url.trim_end_matches('/');
        Self {
            title: profile.name.clone(),
            description: profile.description.clone(),
            link: profile.base_url.clone(),
            language: DEFAULT_LANGUAGE.to_string(),
            generator: GENERATOR.to_string(),
            last_updated: now,
            copyright: format!("All rights reserved {}, {}", now.year(), profile.name),
            image: Some(format!("{}/favicon.ico", base)),
        }
    }

    fn validate(&self) -> SiteFeedResult<()> {
        if self.title.trim().is_empty() {
            return Err(SiteFeedError::InvalidChannel(
                "channel title is empty".to_string(),
            ));
        }
        match Url::parse(self.link.trim()) {
            Ok(url) if url.has_host() => Ok(()),
            _ => Err(SiteFeedError::InvalidChannel(format!(
                "channel link is not an absolute URL: '{}'",
                self.link
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub description: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl From<&ScrapedArticle> for FeedEntry {
    fn from(article: &ScrapedArticle) -> Self {
        Self {
            title: article.title.clone(),
            link: article.url.clone(),
            guid: article.url.clone(),
            description: article.description.clone(),
            author: article.author.clone(),
            category: article.category.clone(),
            pub_date: article.published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub channel: ChannelMeta,
    pub entries: Vec<FeedEntry>,
}

/// Build a feed with one entry per article, in input order.
pub fn synthesize(channel: ChannelMeta, articles: &[ScrapedArticle]) -> SiteFeedResult<FeedDocument> {
    channel.validate()?;

    Ok(FeedDocument {
        channel,
        entries: articles.iter().map(FeedEntry::from).collect(),
    })
}

impl FeedDocument {
    /// Render as an RSS 2.0 XML document.
    pub fn to_rss(&self) -> SiteFeedResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let channel = &self.channel;

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        write(&mut writer, Event::Start(rss))?;
        write(&mut writer, Event::Start(BytesStart::new("channel")))?;

        text_element(&mut writer, "title", &channel.title)?;
        text_element(&mut writer, "link", &channel.link)?;
        text_element(&mut writer, "description", &channel.description)?;
        text_element(&mut writer, "language", &channel.language)?;
        text_element(&mut writer, "generator", &channel.generator)?;
        text_element(&mut writer, "lastBuildDate", &channel.last_updated.to_rfc2822())?;
        text_element(&mut writer, "copyright", &channel.copyright)?;

        if let Some(image) = &channel.image {
            write(&mut writer, Event::Start(BytesStart::new("image")))?;
            text_element(&mut writer, "url", image)?;
            text_element(&mut writer, "title", &channel.title)?;
            text_element(&mut writer, "link", &channel.link)?;
            write(&mut writer, Event::End(BytesEnd::new("image")))?;
        }

        for entry in &self.entries {
            write(&mut writer, Event::Start(BytesStart::new("item")))?;
            text_element(&mut writer, "title", &entry.title)?;
            text_element(&mut writer, "link", &entry.link)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            write(&mut writer, Event::Start(guid))?;
            write(&mut writer, Event::Text(BytesText::new(&xml_safe(&entry.guid))))?;
            write(&mut writer, Event::End(BytesEnd::new("guid")))?;

            text_element(&mut writer, "description", &entry.description)?;
            if let Some(author) = &entry.author {
                text_element(&mut writer, "author", author)?;
            }
            if let Some(category) = &entry.category {
                text_element(&mut writer, "category", category)?;
            }
            text_element(&mut writer, "pubDate", &entry.pub_date.to_rfc2822())?;
            write(&mut writer, Event::End(BytesEnd::new("item")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("channel")))?;
        write(&mut writer, Event::End(BytesEnd::new("rss")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| SiteFeedError::FeedWrite(e.to_string()))
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> SiteFeedResult<()> {
    writer
        .write_event(event)
        .map_err(|e| SiteFeedError::FeedWrite(e.to_string()))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> SiteFeedResult<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(&xml_safe(text))))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

/// Drop control characters XML 1.0 does not allow.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= '\u{20}')
        .collect()
}
