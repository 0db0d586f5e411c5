//! dukagjinibooks.com
//!
//! Product pages list the ISBN as `<h5><span>ISBN</span>: 978...</h5>` inside
//! `.book-item-specifics`. Ratings, page count and description are rendered
//! below the book details, styled after the site's own rating widget.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::{debug, info};
use zana_common::{ProviderType, RatingData};

use super::{Assets, HostModule};
use crate::error::Result;
use crate::events::BookDataEvent;
use crate::merge::{merge, successful, FailureKind, ProviderRating};
use crate::page::Page;
use crate::render::Element;

pub const HOST: &str = "dukagjinibooks.com";
pub const EVENT_NAME: &str = "dukagjiniEvent";

/// Element the add-on appends its fragments to
pub const MOUNT_POINT: &str = "#book-details .container";

pub const CONTAINER_CLASS: &str = "dukagjinibooks-container";
pub const LOADING_CONTAINER_CLASS: &str = "dukagjinibooks-loading-container";

const APP_NAME: &str = "Zana ";
const STAR_COUNT: u32 = 5;
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

const LOADING_IMAGE: &str = "images/dukagjini/loading.gif";
const EXTERNAL_LINK_IMAGE: &str = "images/dukagjini/external_link.svg";

const FILLED_STAR_PATH: &str = "M3.612 15.443c-.386.198-.824-.149-.746-.592l.83-4.73L.173 6.765c-.329-.314-.158-.888.283-.95l4.898-.696L7.538.792c.197-.39.73-.39.927 0l2.184 4.327 4.898.696c.441.062.612.636.283.95l-3.523 3.356.83 4.73c.078.443-.36.79-.746.592L8 13.187l-4.389 2.256z";
const EMPTY_STAR_PATH: &str = "M2.866 14.85c-.078.444.36.791.746.593l4.39-2.256 4.389 2.256c.386.198.824-.149.746-.592l-.83-4.73 3.523-3.356c.329-.314.158-.888-.283-.95l-4.898-.696L8.465.792a.513.513 0 0 0-.927 0L5.354 5.12l-4.898.696c-.441.062-.612.636-.283.95l3.523 3.356-.83 4.73zm4.905-2.767l-3.686 1.894.694-3.957a.565.565 0 0 0-.163-.505L1.71 6.745l4.052-.576a.525.525 0 0 0 .393-.288l1.847-3.658 1.846 3.658a.525.525 0 0 0 .393.288l4.052.575-2.906 2.77a.564.564 0 0 0-.163.506l.694 3.957-3.686-1.894a.503.503 0 0 0-.461 0z";

static BOOK_SPECIFICS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".book-item-specifics h5 span").unwrap());

/// "Powered by" presentation of a provider
struct ProviderBadge {
    label: &'static str,
    image: &'static str,
    width: u32,
}

fn badge(provider: ProviderType) -> ProviderBadge {
    match provider {
        ProviderType::GoogleBooks => ProviderBadge {
            label: "Google Books",
            image: "images/powered_by_googlebooks.png",
            width: 60,
        },
        ProviderType::OpenLibrary => ProviderBadge {
            label: "OpenLibrary",
            image: "images/powered_by_openlibrary.svg",
            width: 100,
        },
    }
}

pub struct DukagjiniBooks {
    assets: Assets,
}

impl DukagjiniBooks {
    pub fn new(assets: Assets) -> Self {
        Self { assets }
    }

    fn missing_data(&self, message: &str) -> Element {
        Element::new("div")
            .class("dukagjinibooks-missing-data-container")
            .text(message)
            .prepend(
                Element::new("span")
                    .class("dukagjinibooks-missing-data-app-name")
                    .text(APP_NAME),
            )
    }

    fn rating(&self, rating: &ProviderRating) -> Element {
        let badge = badge(rating.provider);

        Element::new("div")
            .class("dukagjinibooks-rating")
            .child(stars(rating.rating.average_rating))
            .child(
                Element::new("span")
                    .class("dukagjinibooks-rating-data")
                    .text(&rating_summary(&rating.rating)),
            )
            .child(
                Element::new("img")
                    .attr("src", self.assets.url(badge.image))
                    .class("dukagjinibooks-rating-type-image")
                    .attr("alt", badge.label)
                    .attr("width", badge.width),
            )
            .child(
                Element::new("a")
                    .attr("href", &rating.provider_link)
                    .attr("target", "_blank")
                    .class("dukagjinibooks-rating-external-link")
                    .child(
                        Element::new("img")
                            .attr("src", self.assets.url(EXTERNAL_LINK_IMAGE))
                            .class("dukagjinibooks-rating-external-link-image"),
                    ),
            )
    }
}

/// `147 Reviews (4.50 Average)`
fn rating_summary(rating: &RatingData) -> String {
    format!(
        "{} Reviews ({:.2} Average)",
        rating.ratings_count, rating.average_rating
    )
}

/// Five stars, the first `round(average)` filled
fn stars(average_rating: f32) -> Element {
    let filled = average_rating.round().max(0.0) as u32;

    let mut container = Element::new("div").class("dukagjinibooks-stars");
    for i in 1..=STAR_COUNT {
        let path = if i <= filled {
            FILLED_STAR_PATH
        } else {
            EMPTY_STAR_PATH
        };
        container.append(star(path));
    }
    container
}

fn star(path: &str) -> Element {
    let svg = Element::new("svg")
        .attr("viewBox", "0 0 16 16")
        .attr("width", "1em")
        .attr("height", "1em")
        .attr("focusable", "false")
        .attr("role", "img")
        .attr("aria-label", "star")
        .attr("xmlns", SVG_NAMESPACE)
        .attr("fill", "currentColor")
        .class("bi-star b-icon bi")
        .child(Element::new("g").child(Element::new("path").attr("d", path)));

    Element::new("span")
        .class("b-rating-star dukagjinibooks-star")
        .child(Element::new("span").class("b-rating-icon").child(svg))
}

impl HostModule for DukagjiniBooks {
    fn host(&self) -> &'static str {
        HOST
    }

    fn event_name(&self) -> &'static str {
        EVENT_NAME
    }

    fn query_book_data(&self) -> bool {
        true
    }

    fn retrieve_isbn(&self, page: &Page) -> Option<String> {
        let document = page.document();
        let label = document
            .select(&BOOK_SPECIFICS)
            .find(|span| span.text().collect::<String>().contains("ISBN"))?;
        let parent = label.parent().and_then(ElementRef::wrap)?;

        let text = parent.text().collect::<String>();
        let isbn = text.split(':').nth(1)?.trim();
        if isbn.is_empty() {
            debug!(text = %text, "ISBN label without a value");
            return None;
        }
        Some(isbn.to_string())
    }

    fn loading(&self, page: &mut Page) -> Result<()> {
        let loading = Element::new("div").class(LOADING_CONTAINER_CLASS).child(
            Element::new("img")
                .attr("src", self.assets.url(LOADING_IMAGE))
                .class("dukagjinibooks-loading-image")
                .attr("alt", "Loading..."),
        );
        page.append(MOUNT_POINT, loading)
    }

    fn handle(&self, page: &mut Page, event: &BookDataEvent) -> Result<()> {
        page.remove_class(LOADING_CONTAINER_CLASS);

        if page.contains_class(CONTAINER_CLASS) {
            debug!("Book data already shown");
            return Ok(());
        }

        let mut container = Element::new("div").class("row").class(CONTAINER_CLASS);
        let responses = &event.responses;

        if successful(responses).is_empty() {
            let kind = FailureKind::from_statuses(responses.iter().map(|r| r.status));
            container.append(self.missing_data(kind.message()));
            page.append(MOUNT_POINT, container)?;
            info!(responses = ?responses, "Zana response");
            return Ok(());
        }

        let merged = merge(responses);

        let mut ratings = Element::new("div").class("dukagjinibooks-ratings-container");
        for rating in &merged.ratings {
            ratings.append(self.rating(rating));
        }
        container.append(ratings);

        if let Some(pages) = merged.number_of_pages {
            container.append(
                Element::new("div")
                    .class("dukagjinibooks-metadata-container")
                    .text(&format!("Number of pages: {}", pages)),
            );
        }
        if let Some(description) = &merged.description {
            container.append(
                Element::new("div")
                    .class("dukagjinibooks-description")
                    .text(description),
            );
        }

        page.append(MOUNT_POINT, container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderResponse, ResponseBody};
    use zana_common::{BookData, SuccessResponse};

    const PRODUCT_HTML: &str = r#"<html><body>
        <div id="book-details"><div class="container">
            <div class="book-item-specifics">
                <h5><span>Autori</span>: J.R.R. Tolkien</h5>
                <h5><span>ISBN</span>: 9780261102385 </h5>
                <h5><span>Faqe</span>: 1567</h5>
            </div>
        </div></div>
    </body></html>"#;

    fn module() -> DukagjiniBooks {
        DukagjiniBooks::new(Assets::new("moz-extension://zana"))
    }

    fn page(html: &str) -> Page {
        Page::new("https://dukagjinibooks.com/product/1", html).unwrap()
    }

    fn success(provider: ProviderType, data: BookData, rating: Option<RatingData>) -> ProviderResponse {
        let mut book = SuccessResponse::new(data);
        book.rating = rating;
        ProviderResponse::new("9780261102385", provider, 200, ResponseBody::Success(book))
    }

    fn default_responses() -> Vec<ProviderResponse> {
        vec![
            success(
                ProviderType::GoogleBooks,
                BookData::new(1567, "Description 1", "http://localhost/link/1"),
                Some(RatingData::new(4.5, 147)),
            ),
            success(
                ProviderType::OpenLibrary,
                BookData::new(123, "Description 2", "http://localhost/link/2"),
                Some(RatingData::new(4.515625, 64)),
            ),
        ]
    }

    fn handled(responses: Vec<ProviderResponse>) -> Page {
        let mut page = page(PRODUCT_HTML);
        module()
            .handle(&mut page, &BookDataEvent::new(EVENT_NAME, responses))
            .unwrap();
        page
    }

    fn with_statuses(statuses: [u16; 2]) -> Page {
        let mut responses = default_responses();
        responses[0].status = statuses[0];
        responses[1].status = statuses[1];
        handled(responses)
    }

    fn only<'a>(page: &'a Page, class: &str) -> Vec<&'a Element> {
        page.mounts()
            .iter()
            .flat_map(|mount| mount.node.find_by_class(class))
            .collect()
    }

    #[test]
    fn test_retrieve_isbn() {
        assert_eq!(
            module().retrieve_isbn(&page(PRODUCT_HTML)).as_deref(),
            Some("9780261102385")
        );
    }

    #[test]
    fn test_retrieve_isbn_without_label() {
        let html = r#"<div class="book-item-specifics"><h5><span>Faqe</span>: 1567</h5></div>"#;
        assert_eq!(module().retrieve_isbn(&page(html)), None);
    }

    #[test]
    fn test_retrieve_isbn_without_value() {
        let missing_colon = r#"<div class="book-item-specifics"><h5><span>ISBN</span></h5></div>"#;
        let empty_value = r#"<div class="book-item-specifics"><h5><span>ISBN</span>:  </h5></div>"#;
        assert_eq!(module().retrieve_isbn(&page(missing_colon)), None);
        assert_eq!(module().retrieve_isbn(&page(empty_value)), None);
    }

    #[test]
    fn test_loading_indicator() {
        let mut page = page(PRODUCT_HTML);
        assert!(!page.contains_class(LOADING_CONTAINER_CLASS));

        module().loading(&mut page).unwrap();

        let images = only(&page, "dukagjinibooks-loading-image");
        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0].get_attr("src"),
            Some("moz-extension://zana/images/dukagjini/loading.gif")
        );
        assert_eq!(images[0].get_attr("alt"), Some("Loading..."));
        assert_eq!(page.mounts()[0].target, MOUNT_POINT);
    }

    #[test]
    fn test_loading_without_mount_point() {
        let mut page = page("<html><body></body></html>");
        assert!(module().loading(&mut page).is_err());
    }

    #[test]
    fn test_handle_removes_loading_indicator() {
        let mut page = page(PRODUCT_HTML);
        module().loading(&mut page).unwrap();
        module()
            .handle(&mut page, &BookDataEvent::new(EVENT_NAME, default_responses()))
            .unwrap();

        assert!(!page.contains_class(LOADING_CONTAINER_CLASS));
        assert!(page.contains_class(CONTAINER_CLASS));
    }

    #[test]
    fn test_handle_renders_once() {
        let mut page = page(PRODUCT_HTML);
        let event = BookDataEvent::new(EVENT_NAME, default_responses());
        module().handle(&mut page, &event).unwrap();
        module().handle(&mut page, &event).unwrap();

        assert_eq!(only(&page, CONTAINER_CLASS).len(), 1);
        assert!(page.mounts()[0].node.has_class("row"));
    }

    #[test]
    fn test_description_and_page_count() {
        let page = handled(default_responses());

        assert_eq!(only(&page, "dukagjinibooks-description")[0].text_content(), "Description 1");
        assert_eq!(
            only(&page, "dukagjinibooks-metadata-container")[0].text_content(),
            "Number of pages: 1567"
        );
    }

    #[test]
    fn test_ratings() {
        let page = handled(default_responses());

        let data = only(&page, "dukagjinibooks-rating-data");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].text_content(), "147 Reviews (4.50 Average)");
        assert_eq!(data[1].text_content(), "64 Reviews (4.52 Average)");

        let links = only(&page, "dukagjinibooks-rating-external-link");
        assert_eq!(links[0].get_attr("href"), Some("http://localhost/link/1"));
        assert_eq!(links[1].get_attr("href"), Some("http://localhost/link/2"));
        assert_eq!(links[0].get_attr("target"), Some("_blank"));

        let badges = only(&page, "dukagjinibooks-rating-type-image");
        assert_eq!(badges[0].get_attr("width"), Some("60"));
        assert_eq!(badges[1].get_attr("width"), Some("100"));
        assert_eq!(
            badges[1].get_attr("src"),
            Some("moz-extension://zana/images/powered_by_openlibrary.svg")
        );
    }

    #[test]
    fn test_star_count_follows_rounded_average() {
        let filled = |average: f32| {
            stars(average)
                .find_by_class("dukagjinibooks-star")
                .iter()
                .filter(|star| star.to_html().contains(FILLED_STAR_PATH))
                .count()
        };

        assert_eq!(stars(3.0).find_by_class("dukagjinibooks-star").len(), 5);
        assert_eq!(filled(4.5), 5);
        assert_eq!(filled(4.49), 4);
        assert_eq!(filled(0.0), 0);
        assert_eq!(filled(2.5), 3);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let responses = vec![
            success(ProviderType::GoogleBooks, BookData::new(0, "", "http://a"), None),
            success(ProviderType::OpenLibrary, BookData::new(0, "", "http://b"), None),
        ];
        let page = handled(responses);

        assert!(only(&page, "dukagjinibooks-metadata-container").is_empty());
        assert!(only(&page, "dukagjinibooks-description").is_empty());
        assert!(only(&page, "dukagjinibooks-rating-data").is_empty());
        assert_eq!(only(&page, "dukagjinibooks-ratings-container").len(), 1);
    }

    #[test]
    fn test_values_from_second_provider() {
        let mut responses = default_responses();
        responses[0] = success(ProviderType::GoogleBooks, BookData::new(0, "", "http://a"), None);
        let page = handled(responses);

        assert_eq!(
            only(&page, "dukagjinibooks-metadata-container")[0].text_content(),
            "Number of pages: 123"
        );
        assert_eq!(only(&page, "dukagjinibooks-description")[0].text_content(), "Description 2");
    }

    #[test]
    fn test_failure_messages() {
        let message = |statuses| {
            only(&with_statuses(statuses), "dukagjinibooks-missing-data-container")[0].text_content()
        };

        assert_eq!(message([404, 500]), "Zana did not find any data for this book.");
        assert_eq!(message([404, 429]), "Zana did not find any data for this book.");
        assert_eq!(
            message([429, 500]),
            "Zana has reached the maximum number of requests. Please try again later."
        );
        assert_eq!(
            message([500, 503]),
            "Zana is having trouble retrieving book data at the moment. Please try again later."
        );
    }

    #[test]
    fn test_failure_keeps_single_container() {
        let page = with_statuses([404, 404]);
        assert_eq!(only(&page, CONTAINER_CLASS).len(), 1);
        assert!(only(&page, "dukagjinibooks-ratings-container").is_empty());
    }
}
