use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const TIMESTAMP: &str = "2022-01-18T00:00:00.00";
const IMAGE_HOST: &str = "https://images.openmarket.test";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub vendor_id: u64,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub currency: String,
    pub price: f64,
    pub bargain_price: f64,
    pub discounted_price: f64,
    pub stock: u64,
    pub created_at: String,
    pub issued_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub url: String,
    pub thumbnail_url: String,
    pub issued_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vendor {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub vendors: Vendor,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub page_no: u32,
    pub items_per_page: u32,
    pub total_count: u64,
    pub offset: u64,
    pub limit: u64,
    pub last_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
    pub pages: Vec<Product>,
}

#[derive(Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub discounted_price: f64,
    #[serde(default)]
    pub stock: u64,
    pub secret: String,
}

#[derive(Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail_id: Option<u64>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub discounted_price: Option<f64>,
    pub stock: Option<u64>,
    pub secret: String,
}

#[derive(Deserialize)]
pub struct SecretRequest {
    pub secret: String,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page_no: Option<u32>,
    pub items_per_page: Option<u32>,
}

struct Listing {
    detail: ProductDetail,
    vendor_identifier: String,
    vendor_secret: String,
    product_secret: String,
}

#[derive(Default)]
pub struct Catalog {
    next_id: u64,
    next_image_id: u64,
    vendors: HashMap<String, u64>,
    listings: BTreeMap<u64, Listing>,
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog::default()));
    Router::new()
        .route("/healthChecker", get(health_check))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/{id}", get(get_product).patch(update_product))
        .route("/api/products/{id}/archived", post(product_secret))
        .route("/api/products/{id}/{secret}", delete(delete_product))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn identifier(headers: &HeaderMap) -> Result<String, StatusCode> {
    headers
        .get("identifier")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(StatusCode::UNAUTHORIZED)
}

fn valid_currency(currency: &str) -> bool {
    matches!(currency, "KRW" | "USD")
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_products(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductPage>, StatusCode> {
    let page_no = query.page_no.unwrap_or(1);
    let items_per_page = query.items_per_page.unwrap_or(20);
    if page_no == 0 || items_per_page == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let catalog = db.read().await;
    let total_count = catalog.listings.len() as u64;
    let offset = u64::from(page_no - 1) * u64::from(items_per_page);
    let last_page = total_count.div_ceil(u64::from(items_per_page)).max(1) as u32;
    let pages = catalog
        .listings
        .values()
        .rev()
        .skip(offset as usize)
        .take(items_per_page as usize)
        .map(|listing| listing.detail.product.clone())
        .collect();

    Ok(Json(ProductPage {
        page_no,
        items_per_page,
        total_count,
        offset,
        limit: offset + u64::from(items_per_page),
        last_page,
        has_next: page_no < last_page,
        has_prev: page_no > 1,
        pages,
    }))
}

async fn create_product(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductDetail>), StatusCode> {
    let vendor_identifier = identifier(&headers)?;

    let mut params: Option<NewProduct> = None;
    let mut image_names = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        match name.as_str() {
            "params" => {
                params = Some(serde_json::from_slice(&data).map_err(|_| StatusCode::BAD_REQUEST)?)
            }
            "images" => image_names.push(file_name.unwrap_or_else(|| "image".to_string())),
            _ => {}
        }
    }

    let params = params.ok_or(StatusCode::BAD_REQUEST)?;
    if image_names.is_empty() || !valid_currency(&params.currency) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut catalog = db.write().await;
    catalog.next_id += 1;
    let id = catalog.next_id;
    let vendor_count = catalog.vendors.len() as u64;
    let vendor_id = *catalog
        .vendors
        .entry(vendor_identifier.clone())
        .or_insert(vendor_count + 1);

    let mut images = Vec::with_capacity(image_names.len());
    for file_name in image_names {
        catalog.next_image_id += 1;
        images.push(ProductImage {
            id: catalog.next_image_id,
            url: format!("{IMAGE_HOST}/origin/{id}/{file_name}"),
            thumbnail_url: format!("{IMAGE_HOST}/thumb/{id}/{file_name}"),
            issued_at: TIMESTAMP.to_string(),
        });
    }

    let detail = ProductDetail {
        product: Product {
            id,
            vendor_id,
            name: params.name,
            description: params.description,
            thumbnail: images[0].thumbnail_url.clone(),
            currency: params.currency,
            price: params.price,
            bargain_price: params.price - params.discounted_price,
            discounted_price: params.discounted_price,
            stock: params.stock,
            created_at: TIMESTAMP.to_string(),
            issued_at: TIMESTAMP.to_string(),
        },
        images,
        vendors: Vendor {
            id: vendor_id,
            name: vendor_identifier.clone(),
        },
    };
    catalog.listings.insert(
        id,
        Listing {
            detail: detail.clone(),
            vendor_identifier,
            vendor_secret: params.secret,
            product_secret: Uuid::new_v4().to_string(),
        },
    );
    info!(id, vendor_id, "product registered");
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<ProductDetail>, StatusCode> {
    let catalog = db.read().await;
    catalog
        .listings
        .get(&id)
        .map(|listing| Json(listing.detail.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

fn authorize<'a>(
    catalog: &'a mut Catalog,
    id: u64,
    vendor_identifier: &str,
    vendor_secret: &str,
) -> Result<&'a mut Listing, StatusCode> {
    let listing = catalog.listings.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if listing.vendor_identifier != vendor_identifier || listing.vendor_secret != vendor_secret {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(listing)
}

async fn update_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<ProductDetail>, StatusCode> {
    let vendor_identifier = identifier(&headers)?;
    let mut catalog = db.write().await;
    let listing = authorize(&mut catalog, id, &vendor_identifier, &input.secret)?;
    let detail = &mut listing.detail;

    if let Some(currency) = input.currency {
        if !valid_currency(&currency) {
            return Err(StatusCode::BAD_REQUEST);
        }
        detail.product.currency = currency;
    }
    if let Some(thumbnail_id) = input.thumbnail_id {
        let image = detail
            .images
            .iter()
            .find(|image| image.id == thumbnail_id)
            .ok_or(StatusCode::BAD_REQUEST)?;
        detail.product.thumbnail = image.thumbnail_url.clone();
    }
    if let Some(name) = input.name {
        detail.product.name = name;
    }
    if let Some(description) = input.description {
        detail.product.description = description;
    }
    if let Some(price) = input.price {
        detail.product.price = price;
    }
    if let Some(discounted_price) = input.discounted_price {
        detail.product.discounted_price = discounted_price;
    }
    if let Some(stock) = input.stock {
        detail.product.stock = stock;
    }
    detail.product.bargain_price = detail.product.price - detail.product.discounted_price;
    Ok(Json(detail.clone()))
}

async fn product_secret(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<SecretRequest>,
) -> Result<String, StatusCode> {
    let vendor_identifier = identifier(&headers)?;
    let mut catalog = db.write().await;
    let listing = authorize(&mut catalog, id, &vendor_identifier, &input.secret)?;
    Ok(listing.product_secret.clone())
}

async fn delete_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((id, secret)): Path<(u64, String)>,
) -> Result<StatusCode, StatusCode> {
    let vendor_identifier = identifier(&headers)?;
    let mut catalog = db.write().await;
    let listing = catalog.listings.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if listing.vendor_identifier != vendor_identifier || listing.product_secret != secret {
        return Err(StatusCode::FORBIDDEN);
    }
    catalog.listings.remove(&id);
    info!(id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
