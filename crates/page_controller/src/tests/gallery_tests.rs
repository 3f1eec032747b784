use super::*;
use crate::{surface::MemorySurface, test_support::*};

fn fixture() -> (Arc<FakeCanvasApi>, Arc<MemorySurface>, GalleryController) {
    let api = FakeCanvasApi::new();
    let surface = Arc::new(MemorySurface::with_all_regions());
    let controller = GalleryController::new(
        api.clone() as Arc<dyn CanvasApi>,
        surface.clone() as Arc<dyn RenderSurface>,
        TimestampFormat::utc(),
    );
    (api, surface, controller)
}

fn entries(surface: &MemorySurface) -> Vec<ShowcaseEntry> {
    match surface.content(Region::ShowcaseContainer) {
        Content::Gallery(entries) => entries,
        other => panic!("expected gallery, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_showcase_renders_invitation_and_no_entries() {
    let (api, surface, controller) = fixture();
    api.push_showcase(Reply::Ready(Ok(Vec::new())));

    assert_eq!(controller.load().await, GalleryState::Empty);
    assert_eq!(
        surface.content(Region::ShowcaseContainer),
        Content::message("The showcase is empty. Be the first to share a canvas!")
    );
    assert_eq!(
        surface.region_ops(Region::ShowcaseContainer)[0],
        crate::surface::SurfaceOp::Content(Region::ShowcaseContainer, Content::Loader)
    );
}

#[tokio::test]
async fn entries_follow_server_order() {
    let (api, surface, controller) = fixture();
    api.push_showcase(Reply::Ready(Ok(vec![
        showcase_item("c.jpg", "Carol", None),
        showcase_item("a.jpg", "Alice", Some("alice_id")),
        showcase_item("b.jpg", "Bob", None),
    ])));

    assert_eq!(controller.load().await, GalleryState::Populated(3));

    let sources: Vec<_> = entries(&surface)
        .into_iter()
        .map(|entry| entry.image.src)
        .collect();
    assert_eq!(sources, ["/images/c.jpg", "/images/a.jpg", "/images/b.jpg"]);
}

#[tokio::test]
async fn creator_with_profile_id_is_linked_in_new_context() {
    let (api, surface, controller) = fixture();
    api.push_showcase(Reply::Ready(Ok(vec![
        showcase_item("a.jpg", "Alice", Some("alice_id")),
        showcase_item("b.jpg", "Anon#123456", None),
    ])));
    controller.load().await;

    let rendered = entries(&surface);
    assert_eq!(rendered[0].image.alt, "Canvas by Alice");
    assert_eq!(
        rendered[0].byline,
        vec![
            Inline::text("By "),
            Inline::Link(Link::new_context(
                "https://open.spotify.com/user/alice_id",
                "Alice"
            )),
            Inline::text(" on 5/1/2024, 12:34 PM"),
        ]
    );
    assert_eq!(
        rendered[1].byline,
        vec![Inline::text("By Anon#123456 on 5/1/2024, 12:34 PM")]
    );
}

#[tokio::test]
async fn failure_renders_error_in_gallery_region() {
    let (api, surface, controller) = fixture();
    api.push_showcase(Reply::Ready(Err(server_error("/showcase-items"))));

    assert!(matches!(controller.load().await, GalleryState::Failed(_)));
    assert_eq!(
        surface.content(Region::ShowcaseContainer),
        Content::Error("Failed to load showcase items.".into())
    );
}

#[tokio::test]
async fn gallery_loads_at_most_once() {
    let (api, _surface, controller) = fixture();
    api.push_showcase(Reply::Ready(Err(server_error("/showcase-items"))));
    api.push_showcase(Reply::Ready(Ok(Vec::new())));

    let first = controller.load().await;
    let second = controller.load().await;

    assert_eq!(first, second);
    assert_eq!(api.showcase_call_count(), 1);
}

#[test]
fn timestamps_render_in_configured_offset() {
    let item = showcase_item("a.jpg", "Alice", None);
    let east = TimestampFormat::new(FixedOffset::east_opt(2 * 3600).unwrap());
    assert_eq!(east.format(&item.created_at), "5/1/2024, 02:34 PM");
    assert_eq!(
        TimestampFormat::utc().format(&item.created_at),
        "5/1/2024, 12:34 PM"
    );
}

#[test]
fn profile_ids_are_path_encoded() {
    assert_eq!(
        profile_url("some user"),
        "https://open.spotify.com/user/some%20user"
    );
}
