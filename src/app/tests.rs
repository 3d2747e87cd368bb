use std::io::Cursor;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use ratatui_image::picker::Picker;

use crate::api::{FetchError, ImageResult, Job, PageRequest, ResultPage};
use crate::notify::ToastLevel;
use crate::search::{SearchPhase, messages};

use super::{App, Message, Model, update};

fn create_test_model() -> Model {
    Model::new((80, 24))
}

fn items(count: usize, offset: usize) -> Vec<ImageResult> {
    (offset..offset + count)
        .map(|i| ImageResult {
            thumbnail_url: format!("https://cdn.test/{i}_640.jpg"),
            full_image_url: format!("https://cdn.test/{i}_1280.jpg"),
            tags: format!("tag{i}"),
            likes: 1,
            views: 2,
            downloads: 3,
        })
        .collect()
}

fn type_query(mut model: Model, query: &str) -> Model {
    model = update(model, Message::FocusSearch);
    for c in query.chars() {
        model = update(model, Message::SearchInput(c));
    }
    update(model, Message::SubmitSearch)
}

fn page_jobs(model: &mut Model) -> Vec<PageRequest> {
    model
        .take_jobs()
        .into_iter()
        .filter_map(|job| match job {
            Job::Page(request) => Some(request),
            Job::Image(_) => None,
        })
        .collect()
}

fn answer(model: Model, request: PageRequest, count: usize, total: usize) -> Model {
    let offset = (request.page as usize - 1) * 20;
    update(
        model,
        Message::PageLoaded(
            request,
            Ok(ResultPage {
                items: items(count, offset),
                total_matches: total,
            }),
        ),
    )
}

fn loaded_model(count: usize, total: usize) -> Model {
    let mut model = type_query(create_test_model(), "cats");
    let request = page_jobs(&mut model).remove(0);
    answer(model, request, count, total)
}

fn png_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_typed_query_submits_first_page() {
    let mut model = type_query(create_test_model(), "  cats ");
    assert!(!model.input_focused);
    assert_eq!(model.input, "cats");
    assert_eq!(model.search.phase(), SearchPhase::FirstPageLoading);

    let jobs = page_jobs(&mut model);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].query, "cats");
    assert_eq!(jobs[0].page, 1);
    assert!(model.take_jobs().is_empty());
}

#[test]
fn test_blank_query_only_warns() {
    let mut model = type_query(create_test_model(), "   ");
    assert!(model.take_jobs().is_empty());
    assert_eq!(model.search.phase(), SearchPhase::Idle);
    let toast = model.toasts().latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Warning);
    assert_eq!(toast.message, messages::EMPTY_QUERY);
}

#[test]
fn test_page_loaded_fills_grid_and_selects_first_card() {
    let model = loaded_model(20, 100);
    assert_eq!(model.cards().len(), 20);
    assert_eq!(model.selected, Some(0));
    assert_eq!(model.columns(), 2);
    assert_eq!(model.viewport.total_rows(), 60);
    let toast = model.toasts().latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.message, messages::found(100));
}

#[test]
fn test_scrolling_to_last_card_requests_next_page() {
    let mut model = loaded_model(20, 100);
    model.check_visibility();
    assert!(page_jobs(&mut model).is_empty());

    let mut model = update(model, Message::GoToBottom);
    model.check_visibility();
    let jobs = page_jobs(&mut model);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].page, 2);
    assert_eq!(model.search.phase(), SearchPhase::NextPageLoading);

    // Still in view, but a request is outstanding.
    model.check_visibility();
    assert!(page_jobs(&mut model).is_empty());

    let model = answer(model, jobs[0].clone(), 20, 100);
    assert_eq!(model.cards().len(), 40);
    assert_eq!(model.search.state().page_cursor(), 3);
}

#[test]
fn test_short_first_page_requests_next_page_immediately() {
    let mut model = loaded_model(2, 100);
    model.check_visibility();
    let jobs = page_jobs(&mut model);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].page, 2);
}

#[test]
fn test_exhausted_search_stops_requesting() {
    let mut model = loaded_model(3, 3);
    assert_eq!(model.search.phase(), SearchPhase::Exhausted);
    model.check_visibility();
    assert!(page_jobs(&mut model).is_empty());
    let toast = model.toasts().latest().unwrap();
    assert_eq!(toast.message, messages::END_OF_RESULTS);
}

#[test]
fn test_failed_page_shows_error_and_keeps_cards() {
    let mut model = loaded_model(20, 100);
    model = update(model, Message::GoToBottom);
    model.check_visibility();
    let request = page_jobs(&mut model).remove(0);

    let model = update(
        model,
        Message::PageLoaded(request, Err(FetchError::Status(500))),
    );
    assert_eq!(model.cards().len(), 20);
    assert_eq!(model.search.phase(), SearchPhase::PageLoaded);
    let toast = model.toasts().latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, messages::FETCH_FAILED);
}

#[test]
fn test_failed_page_on_unscrollable_grid_retries_on_user_scroll() {
    let mut model = loaded_model(4, 100);
    model.check_visibility();
    let request = page_jobs(&mut model).remove(0);
    assert_eq!(request.page, 2);
    let mut model = update(
        model,
        Message::PageLoaded(request, Err(FetchError::Transport("reset".to_string()))),
    );
    assert_eq!(model.search.phase(), SearchPhase::PageLoaded);

    // Redraws alone never retry.
    for _ in 0..5 {
        model.check_visibility();
    }
    assert!(page_jobs(&mut model).is_empty());
    model = update(model, Message::ScrollUp(50));
    model.check_visibility();
    assert!(page_jobs(&mut model).is_empty());

    model = update(model, Message::ScrollDown(50));
    model.check_visibility();
    let retry = page_jobs(&mut model);
    assert_eq!(retry.len(), 1);
    assert_eq!(retry[0].page, 2);
    assert_eq!(model.search.phase(), SearchPhase::NextPageLoading);

    // Retyping the same query is still a repeat.
    model = update(model, Message::SearchClearInput);
    let mut model = type_query(model, "cats");
    assert!(page_jobs(&mut model).is_empty());
    assert_eq!(
        model.toasts().latest().unwrap().message,
        messages::REPEATED_QUERY
    );
}

#[test]
fn test_select_down_after_failed_page_retries() {
    let mut model = loaded_model(4, 100);
    model.check_visibility();
    let request = page_jobs(&mut model).remove(0);
    let mut model = update(model, Message::PageLoaded(request, Err(FetchError::Status(502))));
    model.check_visibility();
    assert!(page_jobs(&mut model).is_empty());

    model = update(model, Message::SelectDown);
    model.check_visibility();
    assert_eq!(page_jobs(&mut model).len(), 1);
}

#[test]
fn test_result_for_replaced_query_is_ignored() {
    let mut model = type_query(create_test_model(), "cats");
    let old = page_jobs(&mut model).remove(0);
    model = update(model, Message::SearchClearInput);
    let mut model = type_query(model, "dogs");
    let fresh = page_jobs(&mut model).remove(0);

    let model = answer(model, old, 20, 100);
    assert!(model.cards().is_empty());
    assert_eq!(model.selected, None);

    let model = answer(model, fresh, 20, 100);
    assert_eq!(model.cards().len(), 20);
}

#[test]
fn test_new_search_resets_grid_and_selection() {
    let mut model = loaded_model(20, 100);
    model = update(model, Message::SelectDown);
    model = update(model, Message::SearchClearInput);
    let model = type_query(model, "dogs");
    assert!(model.cards().is_empty());
    assert_eq!(model.selected, None);
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_selection_moves_through_grid() {
    let mut model = loaded_model(5, 5);
    model = update(model, Message::SelectRight);
    assert_eq!(model.selected, Some(1));
    model = update(model, Message::SelectDown);
    assert_eq!(model.selected, Some(3));
    model = update(model, Message::SelectDown);
    assert_eq!(model.selected, Some(4));
    model = update(model, Message::SelectLeft);
    model = update(model, Message::SelectUp);
    assert_eq!(model.selected, Some(1));
    model = update(model, Message::GoToBottom);
    assert_eq!(model.selected, Some(4));
    model = update(model, Message::GoToTop);
    assert_eq!(model.selected, Some(0));
}

#[test]
fn test_select_down_scrolls_selected_card_into_view() {
    let mut model = loaded_model(20, 100);
    for _ in 0..4 {
        model = update(model, Message::SelectDown);
    }
    assert_eq!(model.selected, Some(8));
    let rows = model.card_rows(8);
    let visible = model.viewport.visible_range();
    assert!(visible.start <= rows.start && visible.end >= rows.end);
}

#[test]
fn test_preview_follows_selection() {
    let mut model = loaded_model(3, 3);
    model = update(model, Message::SelectRight);
    model = update(model, Message::OpenPreview);
    assert_eq!(model.lightbox().current_index(), Some(1));
    assert_eq!(
        model.lightbox().current_link(),
        Some("https://cdn.test/1_1280.jpg")
    );

    model = update(model, Message::PreviewNext);
    model = update(model, Message::PreviewNext);
    assert_eq!(model.lightbox().current_index(), Some(0));
    assert_eq!(model.selected, Some(0));

    model = update(model, Message::PreviewPrev);
    assert_eq!(model.selected, Some(2));

    let model = update(model, Message::ClosePreview);
    assert!(!model.lightbox().is_open());
}

#[test]
fn test_preview_without_picker_downloads_nothing() {
    let mut model = loaded_model(3, 3);
    model = update(model, Message::OpenPreview);
    assert!(model.take_jobs().is_empty());
    assert!(!model.preview_loading());
}

#[test]
fn test_preview_downloads_and_decodes_full_image() {
    let mut model = loaded_model(3, 3).with_picker(Some(Picker::halfblocks()));
    model = update(model, Message::OpenPreview);
    let url = "https://cdn.test/0_1280.jpg".to_string();
    assert_eq!(model.take_jobs(), vec![Job::Image(url.clone())]);
    assert!(model.preview_loading());
    assert!(model.is_waiting());

    // Reopening while the download runs does not queue it twice.
    model = update(model, Message::ClosePreview);
    model = update(model, Message::OpenPreview);
    assert!(model.take_jobs().is_empty());

    let mut model = update(model, Message::ImageLoaded(url, Ok(png_bytes())));
    assert!(!model.preview_loading());
    assert!(model.preview_protocol_mut().is_some());
}

#[test]
fn test_broken_preview_image_warns() {
    let mut model = loaded_model(3, 3).with_picker(Some(Picker::halfblocks()));
    model = update(model, Message::OpenPreview);
    let url = "https://cdn.test/0_1280.jpg".to_string();
    let mut model = update(model, Message::ImageLoaded(url, Ok(b"not an image".to_vec())));
    assert!(model.preview_protocol_mut().is_none());
    let toast = model.toasts().latest().unwrap();
    assert_eq!(toast.level, ToastLevel::Warning);
    assert!(toast.message.starts_with("Preview unavailable"));
}

#[test]
fn test_resize_reflows_grid() {
    let model = loaded_model(20, 100);
    let model = update(model, Message::Resize(120, 40));
    assert_eq!(model.columns(), 4);
    assert_eq!(model.viewport.total_rows(), 30);
    let model = update(model, Message::Resize(20, 40));
    assert_eq!(model.columns(), 1);
}

#[test]
fn test_help_toggle_and_quit() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_keys_go_to_search_field_when_focused() {
    let mut model = create_test_model();
    model.input_focused = true;
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::SearchInput('q'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::SubmitSearch)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::BlurSearch)
    );
    assert_eq!(
        App::handle_key(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            &model
        ),
        Some(Message::SearchClearInput)
    );
}

#[test]
fn test_gallery_keys() {
    let model = loaded_model(3, 3);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::FocusSearch)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::SelectDown)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::OpenPreview)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::Quit)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &create_test_model()),
        None
    );
}

#[test]
fn test_preview_keys() {
    let model = update(loaded_model(3, 3), Message::OpenPreview);
    assert_eq!(
        App::handle_key(key(KeyCode::Right), &model),
        Some(Message::PreviewNext)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Left), &model),
        Some(Message::PreviewPrev)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc), &model),
        Some(Message::ClosePreview)
    );
}

#[test]
fn test_any_key_hides_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x')), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_mouse_click_selects_card_under_pointer() {
    let model = loaded_model(5, 5);
    assert_eq!(App::handle_mouse(click(45, 2), &model), Some(Message::SelectCard(1)));
    assert_eq!(App::handle_mouse(click(5, 8), &model), Some(Message::SelectCard(2)));
    // Below the last card.
    assert_eq!(App::handle_mouse(click(45, 16), &model), None);
    assert_eq!(App::handle_mouse(click(10, 0), &model), Some(Message::FocusSearch));
}

#[test]
fn test_mouse_wheel_scrolls() {
    let model = loaded_model(20, 100);
    let wheel = MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 0,
        row: 5,
        modifiers: KeyModifiers::NONE,
    };
    let msg = App::handle_mouse(wheel, &model).unwrap();
    let model = update(model, msg);
    assert_eq!(model.viewport.offset(), 3);
}
