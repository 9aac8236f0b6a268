use blobthumb_core::SourceEvent;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;

/// Solid-color image encoded in the given format
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 120, 200])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode fixture");
    buffer
}

/// Decoded dimensions and sniffed format of encoded bytes
pub fn inspect(data: &[u8]) -> (u32, u32, ImageFormat) {
    let format = image::guess_format(data).expect("known format");
    let img = image::load_from_memory(data).expect("decodable");
    let (w, h) = img.dimensions();
    (w, h, format)
}

pub fn created_event(url: &str) -> SourceEvent {
    SourceEvent::blob_created(url)
}

/// Event Grid schema payload as the functions host forwards it
pub fn event_grid_json(event_type: &str, url: &str) -> Value {
    json!({
        "id": "831e1650-001e-001b-66ab-eeb76e069631",
        "topic": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/imagesacct",
        "subject": "/blobServices/default/containers/images/blobs/photo.jpg",
        "eventType": event_type,
        "eventTime": "2024-03-01T10:00:00.000Z",
        "data": {
            "api": "PutBlob",
            "contentType": "image/jpeg",
            "blobType": "BlockBlob",
            "url": url
        },
        "dataVersion": "",
        "metadataVersion": "1"
    })
}

/// Custom handler invocation body
pub fn invocation(event: Value) -> Value {
    json!({
        "Data": { "eventGridEvent": event },
        "Metadata": { "sys": { "MethodName": "Thumbnail" } }
    })
}
