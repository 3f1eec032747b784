use super::*;
use crate::{
    surface::{MemorySurface, SurfaceOp},
    test_support::*,
};

struct Fixture {
    api: Arc<FakeCanvasApi>,
    surface: Arc<MemorySurface>,
    handles: Arc<DisplayHandles>,
    controller: GenerationController,
}

fn fixture() -> Fixture {
    let api = FakeCanvasApi::new();
    let surface = Arc::new(MemorySurface::with_all_regions());
    let handles = Arc::new(DisplayHandles::new("http://127.0.0.1:8000"));
    let controller = GenerationController::new(
        api.clone() as Arc<dyn CanvasApi>,
        surface.clone() as Arc<dyn RenderSurface>,
        Arc::clone(&handles),
    );
    Fixture {
        api,
        surface,
        handles,
        controller,
    }
}

fn displayed_src(surface: &MemorySurface) -> String {
    match surface.content(Region::CanvasContainer) {
        Content::Image(image) => image.src,
        other => panic!("expected rendered image, got {other:?}"),
    }
}

#[tokio::test]
async fn successful_generation_renders_and_reveals_share() {
    let fx = fixture();
    fx.api.push_canvas(Reply::Ready(png()));

    let state = fx.controller.submit(artists_short_term()).await;

    assert_eq!(state, GenerationState::Rendered);
    assert_eq!(fx.api.canvas_calls(), vec![artists_short_term()]);
    assert!(fx.surface.is_visible(Region::ShareControls));
    assert_eq!(
        fx.controller.availability(),
        ArtifactAvailability::Rendered { generation: 1 }
    );

    let src = displayed_src(&fx.surface);
    assert!(src.starts_with("blob:http://127.0.0.1:8000/"));
    let blob = fx.handles.resolve(&src).expect("live handle");
    assert_eq!(&*blob.bytes, PNG_BYTES);
    assert_eq!(blob.mime_type, "image/png");

    assert_eq!(
        fx.surface.region_ops(Region::CanvasContainer),
        vec![
            SurfaceOp::Content(Region::CanvasContainer, Content::Loader),
            SurfaceOp::Content(
                Region::CanvasContainer,
                Content::Image(ImageView {
                    src,
                    alt: "Top Canvas".into(),
                }),
            ),
        ]
    );
}

#[tokio::test]
async fn server_error_fails_with_message_and_hidden_share() {
    let fx = fixture();
    fx.api
        .push_canvas(Reply::Ready(Err(server_error("/top-canvas"))));

    let state = fx.controller.submit(artists_short_term()).await;

    assert!(matches!(state, GenerationState::Failed(_)));
    assert_eq!(
        fx.surface.content(Region::CanvasContainer),
        Content::Error("Failed to generate canvas. Please try again.".into())
    );
    assert!(!fx.surface.is_visible(Region::ShareControls));
    assert_eq!(fx.controller.availability(), ArtifactAvailability::Hidden);
    assert_eq!(fx.handles.live_count(), 0);
}

#[tokio::test]
async fn loading_is_shown_and_share_hidden_while_requesting() {
    let fx = fixture();
    fx.api.push_canvas(Reply::Ready(png()));
    fx.controller.submit(artists_short_term()).await;
    assert!(fx.surface.is_visible(Region::ShareControls));

    let (release, reply) = Reply::gated(jpeg());
    fx.api.push_canvas(reply);

    let observe = async {
        tokio::task::yield_now().await;
        assert_eq!(fx.controller.state(), GenerationState::Requesting);
        assert_eq!(fx.surface.content(Region::CanvasContainer), Content::Loader);
        assert!(!fx.surface.is_visible(Region::ShareControls));
        assert_eq!(fx.handles.live_count(), 0, "stale artifact must be released");
        release.send(()).expect("release");
    };
    let (state, ()) = tokio::join!(fx.controller.submit(artists_short_term()), observe);

    assert_eq!(state, GenerationState::Rendered);
    assert!(fx.surface.is_visible(Region::ShareControls));
}

#[tokio::test]
async fn repeated_generations_keep_a_single_live_handle() {
    let fx = fixture();
    let mut previous: Option<String> = None;

    for _ in 0..3 {
        fx.api.push_canvas(Reply::Ready(png()));
        fx.controller.submit(artists_short_term()).await;
        let src = displayed_src(&fx.surface);
        if let Some(previous) = previous.replace(src) {
            assert!(fx.handles.resolve(&previous).is_none());
        }
        assert_eq!(fx.handles.live_count(), 1);
    }
    assert_eq!(
        fx.controller.availability(),
        ArtifactAvailability::Rendered { generation: 3 }
    );
}

#[tokio::test]
async fn failed_state_is_retriable() {
    let fx = fixture();
    fx.api
        .push_canvas(Reply::Ready(Err(server_error("/top-canvas"))));
    fx.api.push_canvas(Reply::Ready(png()));

    assert!(matches!(
        fx.controller.submit(artists_short_term()).await,
        GenerationState::Failed(_)
    ));
    assert_eq!(
        fx.controller.submit(artists_short_term()).await,
        GenerationState::Rendered
    );
    assert!(fx.surface.is_visible(Region::ShareControls));
}

#[tokio::test]
async fn concurrent_submissions_resolve_last_write_wins() {
    let fx = fixture();
    let (release_first, first) = Reply::gated(png());
    let (release_second, second) = Reply::gated(jpeg());
    fx.api.push_canvas(first);
    fx.api.push_canvas(second);

    let releases = async {
        tokio::task::yield_now().await;
        release_second.send(()).expect("release second");
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        release_first.send(()).expect("release first");
    };
    let (first_state, second_state, ()) = tokio::join!(
        fx.controller.submit(artists_short_term()),
        fx.controller.submit(artists_short_term()),
        releases
    );

    assert_eq!(first_state, GenerationState::Rendered);
    assert_eq!(second_state, GenerationState::Rendered);
    assert_eq!(fx.api.canvas_calls().len(), 2);

    let blob = fx
        .handles
        .resolve(&displayed_src(&fx.surface))
        .expect("displayed handle is live");
    assert_eq!(&*blob.bytes, PNG_BYTES, "the later response owns the display");
    assert_eq!(fx.handles.live_count(), 1);
}

#[tokio::test]
async fn rejected_submission_shows_reason_without_request() {
    let fx = fixture();
    let err = shared::error::DomainError::LimitOutOfRange {
        value: 0,
        min: 1,
        max: 50,
    };

    let state = fx
        .controller
        .reject(FlowError::validation(FlowKind::Generation, &err));

    assert!(matches!(state, GenerationState::Failed(_)));
    assert!(fx.api.canvas_calls().is_empty());
    assert!(matches!(
        fx.surface.content(Region::CanvasContainer),
        Content::Error(message) if message.contains("limit must be between 1 and 50")
    ));
}

#[tokio::test]
async fn release_revokes_displayed_artifact() {
    let fx = fixture();
    fx.api.push_canvas(Reply::Ready(png()));
    fx.controller.submit(artists_short_term()).await;
    assert_eq!(fx.handles.live_count(), 1);

    assert!(fx.controller.release());
    assert_eq!(fx.handles.live_count(), 0);
    assert!(!fx.controller.release());
}

#[tokio::test]
async fn response_after_release_is_dropped() {
    let fx = fixture();
    let (gate, reply) = Reply::gated(png());
    fx.api.push_canvas(reply);

    let unload = async {
        tokio::task::yield_now().await;
        assert_eq!(fx.surface.content(Region::CanvasContainer), Content::Loader);
        assert!(!fx.controller.release());
        gate.send(()).expect("gate");
    };
    let (state, ()) = tokio::join!(fx.controller.submit(artists_short_term()), unload);

    assert_eq!(state, GenerationState::Requesting);
    assert_eq!(fx.handles.live_count(), 0);
    assert!(!fx.surface.is_visible(Region::ShareControls));
    assert_eq!(fx.surface.content(Region::CanvasContainer), Content::Loader);
    assert_eq!(fx.controller.availability(), ArtifactAvailability::Hidden);
}

#[tokio::test]
async fn failure_after_release_leaves_surface_alone() {
    let fx = fixture();
    let (gate, reply) = Reply::gated(Err(server_error("/top-canvas")));
    fx.api.push_canvas(reply);

    let unload = async {
        tokio::task::yield_now().await;
        fx.controller.release();
        gate.send(()).expect("gate");
    };
    let (state, ()) = tokio::join!(fx.controller.submit(artists_short_term()), unload);

    assert_eq!(state, GenerationState::Requesting);
    assert_eq!(fx.surface.content(Region::CanvasContainer), Content::Loader);
}

#[tokio::test]
async fn submissions_after_release_issue_no_request() {
    let fx = fixture();
    fx.controller.release();

    let state = fx.controller.submit(artists_short_term()).await;

    assert_eq!(state, GenerationState::Idle);
    assert!(fx.api.canvas_calls().is_empty());
    assert!(fx.surface.ops().is_empty());
}

#[tokio::test]
async fn every_option_combination_shows_loader_then_image() {
    use shared::domain::{Limit, TimeRange, TopItemType};

    for &item_type in TopItemType::ALL {
        for &time_range in TimeRange::ALL {
            let fx = fixture();
            let params = CanvasParams::new(item_type, time_range, Limit::new(25).expect("limit"));
            fx.api.push_canvas(Reply::Ready(jpeg()));

            let state = fx.controller.submit(params).await;

            assert_eq!(state, GenerationState::Rendered, "{item_type}/{time_range}");
            assert_eq!(fx.api.canvas_calls(), vec![params]);
            let ops = fx.surface.region_ops(Region::CanvasContainer);
            assert_eq!(ops.len(), 2);
            assert_eq!(
                ops[0],
                SurfaceOp::Content(Region::CanvasContainer, Content::Loader)
            );
            assert!(matches!(
                &ops[1],
                SurfaceOp::Content(Region::CanvasContainer, Content::Image(image))
                    if image.src == displayed_src(&fx.surface)
            ));
        }
    }
}
