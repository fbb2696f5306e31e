use anyhow::Result;

use crate::session::{Lookup, RenderSession};

/// Element whose presence confirms a loaded, valid profile page.
pub const PROFILE_MARKER: &str = "div[data-testid='UserName']";

pub(crate) const BIO: &str = "div[data-testid='UserDescription'] > span";
// Following and followers are sibling cells under one stats container; the
// class chain is the container, nth-child picks the cell.
pub(crate) const FOLLOWING: &str =
    "div.css-175oi2r.r-13awgt0.r-18u37iz.r-1w6e6rj > div:nth-child(1) > a > span:first-child > span";
pub(crate) const FOLLOWERS: &str =
    "div.css-175oi2r.r-13awgt0.r-18u37iz.r-1w6e6rj > div:nth-child(2) > a > span:first-child > span";
pub(crate) const LOCATION: &str = "span[data-testid='UserLocation'] > span > span";
pub(crate) const WEBSITE: &str = "a[data-testid='UserUrl']";

/// The five per-profile fields. Always strings, possibly empty, never missing.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub bio: String,
    pub follower_count: String,
    pub following_count: String,
    pub location: String,
    pub website: String,
}

/// Run all five lookups against the current page. A field that fails to
/// resolve becomes the empty string and never aborts the others.
pub async fn extract_fields(session: &dyn RenderSession) -> Result<ProfileFields> {
    let bio = text_or_empty(session, BIO).await?;
    let (following_count, follower_count) = follow_counts(session).await?;
    let location = text_or_empty(session, LOCATION).await?;
    let website = session.find_attribute(WEBSITE, "href").await?.or_empty();

    Ok(ProfileFields {
        bio,
        follower_count,
        following_count,
        location,
        website,
    })
}

async fn text_or_empty(session: &dyn RenderSession, selector: &str) -> Result<String> {
    Ok(session.find_text(selector).await?.or_empty())
}

/// The count pair shares one fallback: both cells sit under the same
/// container, so unless both resolve, both come back empty.
async fn follow_counts(session: &dyn RenderSession) -> Result<(String, String)> {
    let following = session.find_text(FOLLOWING).await?;
    let followers = session.find_text(FOLLOWERS).await?;
    match (following, followers) {
        (Lookup::Found(following), Lookup::Found(followers)) => Ok((following, followers)),
        _ => Ok((String::new(), String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::mock::{MockPage, MockSession};

    fn full_page() -> MockPage {
        MockPage::ready()
            .with_text(BIO, "Systems programmer. Opinions my own.")
            .with_text(FOLLOWING, "1,024")
            .with_text(FOLLOWERS, "2.5M")
            .with_text(LOCATION, "Berlin")
            .with_attr(WEBSITE, "href", "https://example.org")
    }

    async fn open(page: MockPage) -> MockSession {
        let session = MockSession::new().with_page("https://x.com/someone", page);
        session.navigate("https://x.com/someone").await.unwrap();
        session
    }

    #[tokio::test]
    async fn all_fields_present() {
        let session = open(full_page()).await;
        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.bio, "Systems programmer. Opinions my own.");
        assert_eq!(fields.following_count, "1,024");
        assert_eq!(fields.follower_count, "2.5M");
        assert_eq!(fields.location, "Berlin");
        assert_eq!(fields.website, "https://example.org");
    }

    #[tokio::test]
    async fn missing_bio_leaves_other_fields_alone() {
        let page = MockPage::ready()
            .with_text(FOLLOWING, "10")
            .with_text(FOLLOWERS, "20")
            .with_text(LOCATION, "Oslo")
            .with_attr(WEBSITE, "href", "https://example.org");
        let session = open(page).await;

        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.bio, "");
        assert_eq!(fields.following_count, "10");
        assert_eq!(fields.follower_count, "20");
        assert_eq!(fields.location, "Oslo");
        assert_eq!(fields.website, "https://example.org");
    }

    #[tokio::test]
    async fn missing_stats_container_empties_both_counts() {
        let page = MockPage::ready().with_text(BIO, "hello");
        let session = open(page).await;

        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.following_count, "");
        assert_eq!(fields.follower_count, "");
        assert_eq!(fields.bio, "hello");
    }

    #[tokio::test]
    async fn one_missing_count_empties_the_pair() {
        let page = MockPage::ready().with_text(FOLLOWING, "10");
        let session = open(page).await;

        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.following_count, "");
        assert_eq!(fields.follower_count, "");
    }

    #[tokio::test]
    async fn website_comes_from_the_link_target() {
        let page = MockPage::ready()
            .with_text(WEBSITE, "example.org")
            .with_attr(WEBSITE, "href", "https://t.co/abc123");
        let session = open(page).await;

        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.website, "https://t.co/abc123");
    }

    #[tokio::test]
    async fn website_empty_without_link_target() {
        let page = MockPage::ready().with_text(WEBSITE, "example.org");
        let session = open(page).await;

        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields.website, "");
    }

    #[tokio::test]
    async fn bare_page_yields_all_empty_fields() {
        let session = open(MockPage::ready()).await;
        let fields = extract_fields(&session).await.unwrap();
        assert_eq!(fields, ProfileFields::default());
    }
}
