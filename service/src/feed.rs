use cached::proc_macro::cached;
use lazy_static::lazy_static;
use log::error;
use regex::Regex;
use reqwest::header::USER_AGENT;

use crate::dto::FeedItem;
use crate::error::GenericError;

pub const MAX_ITEMS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

pub(crate) const GENERIC_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ClubSite/1.0; +https://example.org)";

/// The two upstream feeds the site proxies so browsers never fetch
/// cross-origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Fftt,
    Handisport,
}

impl FeedSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fftt => "FFTT",
            Self::Handisport => "Handisport",
        }
    }

    fn url(&self) -> &'static str {
        match self {
            Self::Fftt => "https://www.fftt.com/site/actualites/rss.xml",
            Self::Handisport => "https://www.handisport.org/feed/",
        }
    }
}

lazy_static! {
    static ref ITEM: Regex = Regex::new(r"(?s)<item>(.*?)</item>").unwrap();
    static ref TITLE_CDATA: Regex =
        Regex::new(r"(?s)<title><!\[CDATA\[(.*?)\]\]></title>").unwrap();
    static ref TITLE: Regex = Regex::new(r"(?s)<title>(.*?)</title>").unwrap();
    static ref LINK_CDATA: Regex = Regex::new(r"(?s)<link><!\[CDATA\[(.*?)\]\]></link>").unwrap();
    static ref LINK: Regex = Regex::new(r"(?s)<link>(.*?)</link>").unwrap();
    static ref DESCRIPTION_CDATA: Regex =
        Regex::new(r"(?s)<description><!\[CDATA\[(.*?)\]\]></description>").unwrap();
    static ref DESCRIPTION: Regex = Regex::new(r"(?s)<description>(.*?)</description>").unwrap();
    static ref PUB_DATE_CDATA: Regex =
        Regex::new(r"(?s)<pubDate><!\[CDATA\[(.*?)\]\]></pubDate>").unwrap();
    static ref PUB_DATE: Regex = Regex::new(r"(?s)<pubDate>(.*?)</pubDate>").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

fn first_capture(block: &str, cdata: &Regex, plain: &Regex) -> String {
    cdata
        .captures(block)
        .or_else(|| plain.captures(block))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Descriptions are stripped of embedded HTML and truncated on a character
/// boundary. Both feed sources get the same treatment.
fn clean_description(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, "");
    stripped.trim().chars().take(MAX_DESCRIPTION_CHARS).collect()
}

pub fn extract_items(xml: &str) -> Vec<FeedItem> {
    ITEM.captures_iter(xml)
        .take(MAX_ITEMS)
        .map(|captures| {
            let block = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            FeedItem {
                title: first_capture(block, &TITLE_CDATA, &TITLE),
                link: first_capture(block, &LINK_CDATA, &LINK),
                description: clean_description(&first_capture(
                    block,
                    &DESCRIPTION_CDATA,
                    &DESCRIPTION,
                )),
                pub_date: first_capture(block, &PUB_DATE_CDATA, &PUB_DATE),
            }
        })
        .collect()
}

/// Fetches and normalizes one upstream feed. Successful item lists are
/// cached for an hour; errors are never cached.
#[cached(time = 3600, result = true)]
pub async fn fetch_feed(source: FeedSource) -> Result<Vec<FeedItem>, GenericError> {
    let response = reqwest::Client::new()
        .get(source.url())
        .header(USER_AGENT, GENERIC_USER_AGENT)
        .send()
        .await
        .map_err(|e| {
            error!("unable to reach {} feed: {}", source.label(), e);
            GenericError::FeedUnavailable("Unable to reach the upstream feed")
        })?;

    if !response.status().is_success() {
        error!(
            "{} feed answered with status {}",
            source.label(),
            response.status()
        );
        return Err(GenericError::FeedUnavailable(
            "Upstream feed returned an error status",
        ));
    }

    let body = response.text().await.map_err(|e| {
        error!("unable to read {} feed body: {}", source.label(), e);
        GenericError::FeedUnavailable("Unable to read the upstream feed")
    })?;

    Ok(extract_items(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str) -> String {
        format!(
            "<item><title>{title}</title><link>https://example.org/a</link>\
             <description>{description}</description>\
             <pubDate>Mon, 01 Jan 2024 10:00:00 +0100</pubDate></item>"
        )
    }

    #[test]
    fn cdata_title_wins_over_plain_tag() {
        let xml = "<rss><channel><item>\
                   <title><![CDATA[Titre officiel]]></title>\
                   <link>https://example.org/n</link>\
                   <description><![CDATA[Texte <b>riche</b>]]></description>\
                   <pubDate>Tue, 02 Jan 2024 09:00:00 +0100</pubDate>\
                   </item></channel></rss>";
        let items = extract_items(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Titre officiel");
        assert_eq!(items[0].description, "Texte riche");
    }

    #[test]
    fn stops_after_ten_items() {
        let xml: String = (0..14).map(|i| item(&format!("t{i}"), "d")).collect();
        let items = extract_items(&xml);
        assert_eq!(items.len(), MAX_ITEMS);
        assert_eq!(items[0].title, "t0");
        assert_eq!(items[9].title, "t9");
    }

    #[test]
    fn description_is_stripped_and_truncated_on_char_boundary() {
        let long = format!("<p>{}</p>", "é".repeat(300));
        let items = extract_items(&item("t", &long));
        assert_eq!(items[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(!items[0].description.contains('<'));
    }

    #[test]
    fn unmatched_fields_default_to_empty_strings() {
        let items = extract_items("<item><title>seul</title></item>");
        assert_eq!(items[0].title, "seul");
        assert_eq!(items[0].link, "");
        assert_eq!(items[0].description, "");
        assert_eq!(items[0].pub_date, "");
    }

    #[test]
    fn no_items_yields_empty_list() {
        assert!(extract_items("<rss><channel></channel></rss>").is_empty());
    }
}
