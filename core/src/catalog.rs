//! Endpoint descriptors for the product catalog API.
//!
//! # Design
//! `ProductEndpoints` holds only the base address and the vendor identifier.
//! Each method resolves its URL through `UrlBuilder` and returns a typed
//! `Endpoint`; nothing here touches the network. Run the result with
//! `DataTransferService`.

use crate::config::ClientConfig;
use crate::decoder::RawTextResponseDecoder;
use crate::endpoint::{Endpoint, EndpointBuilder, NoContent};
use crate::error::TransferError;
use crate::multipart::MultipartForm;
use crate::types::{ImageFile, NewProduct, ProductDetail, ProductPage, ProductUpdate, SecretRequest};
use crate::url_builder::UrlBuilder;

const PRODUCTS_PATH: &str = "/api/products";
const HEALTH_PATH: &str = "/healthChecker";
const IDENTIFIER_HEADER: &str = "identifier";

#[derive(Debug, Clone)]
pub struct ProductEndpoints {
    base: UrlBuilder,
    identifier: Option<String>,
}

impl ProductEndpoints {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base: UrlBuilder::new()
                .scheme(&config.scheme)
                .host(&config.host)
                .port(config.port),
            identifier: config.identifier.clone(),
        }
    }

    pub fn health_check(&self) -> Result<Endpoint<String, RawTextResponseDecoder>, TransferError> {
        let url = self.base.clone().path(HEALTH_PATH).build()?;
        Ok(EndpointBuilder::get(url).decode_with(RawTextResponseDecoder))
    }

    pub fn list(&self, page_no: u32, items_per_page: u32) -> Result<Endpoint<ProductPage>, TransferError> {
        let url = self
            .products()
            .query("page_no", page_no)
            .query("items_per_page", items_per_page)
            .build()?;
        Ok(EndpointBuilder::get(url).returning())
    }

    pub fn detail(&self, id: u64) -> Result<Endpoint<ProductDetail>, TransferError> {
        let url = self.products().segment(id).build()?;
        Ok(EndpointBuilder::get(url).returning())
    }

    /// Register a product. Sent as multipart: one JSON `params` part and one
    /// `images` part per image.
    pub fn create(
        &self,
        product: &NewProduct,
        images: &[ImageFile],
    ) -> Result<Endpoint<ProductDetail>, TransferError> {
        let url = self.products().build()?;
        let params =
            serde_json::to_vec(product).map_err(|e| TransferError::EncodingFailed(e.to_string()))?;

        let form = images.iter().fold(
            MultipartForm::new().part("params", "application/json", &params),
            |form, image| form.file("images", &image.file_name, &image.content_type, &image.data),
        );
        let (content_type, body) = form.finish();

        Ok(self
            .mutating(EndpointBuilder::post(url))
            .body(content_type, body)
            .returning())
    }

    pub fn update(&self, id: u64, update: &ProductUpdate) -> Result<Endpoint<ProductDetail>, TransferError> {
        let url = self.products().segment(id).build()?;
        Ok(self
            .mutating(EndpointBuilder::patch(url))
            .json_body(update)?
            .returning())
    }

    /// Look up the product secret needed by `delete`. The server answers
    /// with the secret as plain text.
    pub fn secret(
        &self,
        id: u64,
        request: &SecretRequest,
    ) -> Result<Endpoint<String, RawTextResponseDecoder>, TransferError> {
        let url = self.products().segment(id).segment("archived").build()?;
        Ok(self
            .mutating(EndpointBuilder::post(url))
            .json_body(request)?
            .decode_with(RawTextResponseDecoder))
    }

    pub fn delete(&self, id: u64, product_secret: &str) -> Result<Endpoint<NoContent>, TransferError> {
        let url = self
            .products()
            .segment(id)
            .segment(product_secret)
            .build()?;
        Ok(self.mutating(EndpointBuilder::delete(url)).returning_nothing())
    }

    fn products(&self) -> UrlBuilder {
        self.base.clone().path(PRODUCTS_PATH)
    }

    fn mutating(&self, builder: EndpointBuilder) -> EndpointBuilder {
        match &self.identifier {
            Some(identifier) => builder.header(IDENTIFIER_HEADER, identifier.as_str()),
            None => builder,
        }
    }
}
