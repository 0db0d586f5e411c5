use std::fs;
use std::path::PathBuf;

use wiremock::ResponseTemplate;

pub fn get_sample(sample: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("sample")
        .join(sample);
    fs::read_to_string(path).expect("could not read sample file")
}

pub fn json_response(status_code: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status_code).set_body_raw(body.to_string(), "application/json")
}
