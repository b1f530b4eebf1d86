use utoipa::OpenApi;

use mivora::openapi;

fn main() {
    let oapi: utoipa::openapi::OpenApi = openapi::ApiDoc::openapi();
    println!("{}", oapi.to_pretty_json().unwrap());
}
