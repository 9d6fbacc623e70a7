use actix_web::{
    http::StatusCode,
    web::{self, Bytes, Data, Query},
    HttpResponse, Scope,
};
use tracing::{error, info, warn};

use crate::{
    api::types::{FilenameQuery, HealthResponse, MessageResponse, RootResponse, UploadResponse},
    core::{merkle::MerkleError, services::VaultService},
    storage::StorageError,
    utils::error::VaultError,
};

pub fn scope() -> Scope {
    web::scope("")
        .service(web::resource("/upload").route(web::post().to(upload_file)))
        .service(web::resource("/request_file").route(web::get().to(request_file)))
        .service(web::resource("/root").route(web::get().to(current_root)))
        .service(web::resource("/health").route(web::get().to(health)))
}

fn error_response(error: &VaultError) -> HttpResponse {
    let (status, message) = match error {
        VaultError::Storage(StorageError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "File not found".to_string())
        }
        VaultError::Merkle(MerkleError::LeafNotFound(_) | MerkleError::EmptyTree) => (
            StatusCode::NOT_FOUND,
            "File is not part of the current Merkle tree".to_string(),
        ),
        VaultError::Storage(StorageError::InvalidFilename(_))
        | VaultError::Merkle(MerkleError::HashInput(_))
        | VaultError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, error.to_string()),
        VaultError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, error.to_string()),
        _ => {
            error!("Request failed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        }
    };
    HttpResponse::build(status).json(MessageResponse { message })
}

fn require_filename(query: &FilenameQuery) -> Result<&str, HttpResponse> {
    match query.filename.as_deref() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => {
            warn!("No filename in request");
            Err(HttpResponse::BadRequest().json(MessageResponse {
                message: "Missing filename parameter".into(),
            }))
        }
    }
}

async fn upload_file(
    service: Data<VaultService>,
    query: Query<FilenameQuery>,
    body: Bytes,
) -> HttpResponse {
    let filename = match require_filename(&query) {
        Ok(name) => name,
        Err(response) => return response,
    };
    info!("Received upload for {} ({} bytes)", filename, body.len());

    match service.upload(filename, &body).await {
        Ok(receipt) => HttpResponse::Ok().json(UploadResponse {
            message: "File uploaded successfully".into(),
            hash: receipt.hash,
            leaf_index: receipt.leaf_index,
            root: receipt.root,
            uploaded_at: receipt.uploaded_at,
        }),
        Err(e) => {
            warn!("Upload of {} failed: {}", filename, e);
            error_response(&e)
        }
    }
}

async fn request_file(service: Data<VaultService>, query: Query<FilenameQuery>) -> HttpResponse {
    let filename = match require_filename(&query) {
        Ok(name) => name,
        Err(response) => return response,
    };

    match service.request_file(filename).await {
        Ok(bundle) => {
            info!("Serving {} with {}-step proof", filename, bundle.proof.len());
            HttpResponse::Ok().json(bundle)
        }
        Err(e) => {
            warn!("Request for {} failed: {}", filename, e);
            error_response(&e)
        }
    }
}

async fn current_root(service: Data<VaultService>) -> HttpResponse {
    let status = service.root_status();
    HttpResponse::Ok().json(RootResponse {
        root: status.root,
        leaf_count: status.leaf_count,
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
