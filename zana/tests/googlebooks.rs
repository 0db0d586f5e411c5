//! Google Books client tests against a mock server

mod util;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};
use zana::googlebooks::Client;
use zana::{Book, BookClient, ClientError, Rating};

use crate::util::{get_sample, json_response};

const VOLUMES_PATH: &str = "/books/v1/volumes";
const API_KEY: &str = "test-api-key";
const DESCRIPTION: &str = "Logen Ninefingers, infamous barbarian, has finally run out of luck.";
const INFO_LINK: &str = "https://books.google.com/books?id=hQDIDAAAQBAJ&source=gbs_api";

fn create_client(server: &MockServer) -> Client {
    Client::new(API_KEY, &server.uri()).expect("could not create client")
}

async fn mount_volume(server: &MockServer, query: &str, status_code: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(VOLUMES_PATH))
        .and(query_param("key", API_KEY))
        .and(query_param("maxResults", "1"))
        .and(query_param("q", query))
        .respond_with(json_response(status_code, body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_book_by_isbn() {
    let server = MockServer::start().await;
    mount_volume(
        &server,
        "isbn:9780316387316",
        200,
        &get_sample("googlebooks_volume.json"),
    )
    .await;

    let book = create_client(&server)
        .book_by_isbn("9780316387316")
        .await
        .expect("could not get book by isbn");

    assert_eq!(
        Book::new_with_rating(542, DESCRIPTION, INFO_LINK, Rating::new(4.5, 23)),
        book
    );
}

#[tokio::test]
async fn fetch_book_by_author_and_title() {
    let server = MockServer::start().await;
    mount_volume(
        &server,
        "inauthor:Joe Abercrombie intitle:The Blade Itself",
        200,
        &get_sample("googlebooks_volume.json"),
    )
    .await;

    let book = create_client(&server)
        .book("Joe Abercrombie", "The Blade Itself")
        .await
        .expect("could not get book by author and title");

    assert_eq!(542, book.page_count);
}

#[tokio::test]
async fn fetch_book_without_ratings() {
    let server = MockServer::start().await;
    mount_volume(
        &server,
        "isbn:9780316387316",
        200,
        &get_sample("googlebooks_volume_no_rating.json"),
    )
    .await;

    let book = create_client(&server)
        .book_by_isbn("9780316387316")
        .await
        .expect("could not get book by isbn");

    assert_eq!(Book::new(542, DESCRIPTION, INFO_LINK), book);
}

#[tokio::test]
async fn return_not_found_when_no_items_returned() {
    let server = MockServer::start().await;
    mount_volume(&server, "isbn:0000000000000", 200, "{}").await;

    let result = create_client(&server).book_by_isbn("0000000000000").await;

    assert!(matches!(result, Err(ClientError::NotFound)));
}

#[tokio::test]
async fn return_rate_limit_error_on_429_and_403() {
    for status_code in [429, 403] {
        let server = MockServer::start().await;
        mount_volume(&server, "isbn:9780316387316", status_code, "{}").await;

        let result = create_client(&server).book_by_isbn("9780316387316").await;

        assert!(
            matches!(result, Err(ClientError::RateLimitExceeded)),
            "status {} should map to RateLimitExceeded",
            status_code
        );
    }
}

#[tokio::test]
async fn return_http_error_with_body_on_server_error() {
    let server = MockServer::start().await;
    mount_volume(&server, "isbn:9780316387316", 500, "{\"error\":\"boom\"}").await;

    let result = create_client(&server).book_by_isbn("9780316387316").await;

    match result {
        Err(ClientError::Http(status_code, body)) => {
            assert_eq!(500, status_code);
            assert_eq!("{\"error\":\"boom\"}", body);
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}
