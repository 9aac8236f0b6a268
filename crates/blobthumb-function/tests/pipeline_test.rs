mod helpers;

use blobthumb_core::PipelineError;
use blobthumb_function::Outcome;
use helpers::fixtures::{created_event, encoded_image, inspect};
use helpers::TestPipeline;
use image::ImageFormat;

#[tokio::test]
async fn test_jpeg_thumbnail_is_published() {
    let env = TestPipeline::new(400);
    let url = env
        .seed_source("photo.jpg", encoded_image(1600, 1200, ImageFormat::Jpeg))
        .await;

    let outcome = env.pipeline().handle(&created_event(&url)).await.unwrap();

    match &outcome {
        Outcome::Published {
            destination,
            content_type,
            width,
            height,
            ..
        } => {
            assert_eq!(
                destination,
                "https://imagesacct.blob.core.windows.net/thumbnails/photo.jpg"
            );
            assert_eq!(content_type, "image/jpeg");
            assert_eq!((*width, *height), (400, 300));
        }
        other => panic!("expected published outcome, got {:?}", other),
    }

    let thumb = env.thumbnail("photo.jpg").await.expect("thumbnail written");
    assert_eq!(thumb.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(inspect(&thumb.data), (400, 300, ImageFormat::Jpeg));
    assert_eq!(env.publish.upload_count(), 1);
}

#[tokio::test]
async fn test_divisor_rounding_drives_height() {
    let env = TestPipeline::new(300);
    let url = env
        .seed_source("wide.png", encoded_image(1000, 750, ImageFormat::Png))
        .await;

    env.pipeline().handle(&created_event(&url)).await.unwrap();

    let thumb = env.thumbnail("wide.png").await.unwrap();
    assert_eq!(inspect(&thumb.data), (300, 250, ImageFormat::Png));
    assert_eq!(thumb.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_encoder_follows_extension_case_insensitively() {
    let env = TestPipeline::new(20);
    let url = env
        .seed_source("anim/Loop.GIF", encoded_image(80, 40, ImageFormat::Gif))
        .await;

    env.pipeline().handle(&created_event(&url)).await.unwrap();

    let thumb = env.thumbnail("anim/Loop.GIF").await.unwrap();
    assert_eq!(inspect(&thumb.data), (20, 10, ImageFormat::Gif));
    assert_eq!(thumb.content_type.as_deref(), Some("image/gif"));
}

#[tokio::test]
async fn test_unsupported_extension_is_skipped_without_io() {
    let env = TestPipeline::new(400);
    let url = env
        .seed_source("icon.bmp", encoded_image(1600, 1200, ImageFormat::Png))
        .await;

    let outcome = env.pipeline().handle(&created_event(&url)).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Skipped {
            source: url,
            extension: ".bmp".to_string()
        }
    );
    assert_eq!(env.fetch.download_count(), 0);
    assert_eq!(env.publish.upload_count(), 0);
}

#[tokio::test]
async fn test_missing_extension_is_skipped() {
    let env = TestPipeline::new(400);
    let url = env.seed_source("README", vec![1, 2, 3]).await;

    let outcome = env.pipeline().handle(&created_event(&url)).await.unwrap();
    assert!(matches!(outcome, Outcome::Skipped { extension, .. } if extension.is_empty()));
}

#[tokio::test]
async fn test_narrow_source_is_not_upscaled() {
    let env = TestPipeline::new(400);
    let url = env
        .seed_source("banner.png", encoded_image(300, 120, ImageFormat::Png))
        .await;

    let err = env
        .pipeline()
        .handle(&created_event(&url))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::UpscaleUnsupported {
            source_width: 300,
            target_width: 400
        }
    ));
    assert!(env.thumbnail("banner.png").await.is_none());
    assert_eq!(env.publish.upload_count(), 0);
}

#[tokio::test]
async fn test_corrupt_source_is_decode_error() {
    let env = TestPipeline::new(100);
    let url = env
        .seed_source("broken.jpg", b"not really a jpeg".to_vec())
        .await;

    let err = env
        .pipeline()
        .handle(&created_event(&url))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Decode { .. }));
    assert_eq!(env.publish.upload_count(), 0);
}

#[tokio::test]
async fn test_missing_source_is_transport_error() {
    let env = TestPipeline::new(100);
    let url = format!("{}/gone.png", helpers::IMAGES_URL);

    let err = env
        .pipeline()
        .handle(&created_event(&url))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Transport(_)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_publish_failure_is_surfaced() {
    let env = TestPipeline::new(400);
    let url = env
        .seed_source("photo.jpg", encoded_image(1600, 1200, ImageFormat::Jpeg))
        .await;
    env.publish.fail_uploads(true);

    let err = env
        .pipeline()
        .handle(&created_event(&url))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Transport(_)));
    assert!(env.thumbnail("photo.jpg").await.is_none());
}

#[tokio::test]
async fn test_source_outside_image_container_is_rejected() {
    let env = TestPipeline::new(400);
    let url = "https://imagesacct.blob.core.windows.net/uploads/photo.jpg";

    let err = env
        .pipeline()
        .handle(&created_event(url))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ContainerMismatch { .. }));
    assert_eq!(env.fetch.download_count(), 0);
}

#[tokio::test]
async fn test_other_event_types_are_ignored() {
    let env = TestPipeline::new(400);
    let mut event = created_event("https://imagesacct.blob.core.windows.net/images/photo.jpg");
    event.event_type = "Microsoft.Storage.BlobDeleted".to_string();

    let outcome = env.pipeline().handle(&event).await.unwrap();

    assert!(matches!(outcome, Outcome::Ignored { .. }));
    assert_eq!(env.fetch.download_count(), 0);
}

#[tokio::test]
async fn test_rerun_overwrites_existing_thumbnail() {
    let env = TestPipeline::new(50);
    let url = env
        .seed_source("photo.png", encoded_image(200, 100, ImageFormat::Png))
        .await;
    let pipeline = env.pipeline();

    pipeline.handle(&created_event(&url)).await.unwrap();
    env.seed_source("photo.png", encoded_image(200, 200, ImageFormat::Png))
        .await;
    pipeline.handle(&created_event(&url)).await.unwrap();

    let thumb = env.thumbnail("photo.png").await.unwrap();
    assert_eq!(inspect(&thumb.data), (50, 50, ImageFormat::Png));
    assert_eq!(env.publish.upload_count(), 2);
}

#[tokio::test]
async fn test_percent_encoded_names_keep_their_path() {
    let env = TestPipeline::new(10);
    let url = env
        .seed_source("my%20photos/summer%20day.png", encoded_image(40, 20, ImageFormat::Png))
        .await;

    let outcome = env.pipeline().handle(&created_event(&url)).await.unwrap();

    match outcome {
        Outcome::Published { destination, .. } => assert_eq!(
            destination,
            "https://imagesacct.blob.core.windows.net/thumbnails/my%20photos/summer%20day.png"
        ),
        other => panic!("expected published outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reserved_characters_in_names_round_trip() {
    let env = TestPipeline::new(10);
    for name in ["photo~1.png", "beach%231.png", "100%25%20done%5Bv2%5D.png"] {
        let url = env
            .seed_source(name, encoded_image(40, 20, ImageFormat::Png))
            .await;

        env.pipeline().handle(&created_event(&url)).await.unwrap();

        let thumb = env.thumbnail(name).await.expect("thumbnail written");
        assert_eq!(inspect(&thumb.data), (10, 5, ImageFormat::Png));
    }
    assert_eq!(env.publish.upload_count(), 3);
}
