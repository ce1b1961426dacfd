//! ctxmenu - drives a scripted context menu session against a headless
//! document and prints the rendered menu tree as JSON.

use std::time::Duration;

use ctxmenu_core::logging::{init_logging, LogConfig};
use ctxmenu_core::{CtxMenuError, MenuItem, Point, PointerEvent, Rect};
use ctxmenu_ui::{ContextMenuHandle, HeadlessDocument, HeadlessElement, Host};

fn main() {
    let log_config = LogConfig::new(ctxmenu_core::logging::log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting ctxmenu session");

    if let Err(e) = run() {
        tracing::error!(error = %e, "Session failed");
        let info = e.to_error_info();
        eprintln!("{}", info.message);
        if let Some(hint) = info.hint {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<(), CtxMenuError> {
    let menu = ContextMenuHandle::instance_or_init(|| {
        let mut doc = HeadlessDocument::new(800.0, 600.0);
        let canvas = HeadlessElement::new("main").id("canvas");
        doc.insert(canvas.rect(Rect::new(0.0, 0.0, 800.0, 600.0)));
        Box::new(doc)
    });

    menu.attach(
        "#canvas",
        vec![
            MenuItem::heading("Canvas"),
            MenuItem::divider(),
            MenuItem::action("Copy", |event| {
                tracing::info!(x = event.position.x, y = event.position.y, "Copy clicked");
            })
            .tooltip("Copy the selection"),
            MenuItem::anchor("Export", "/export.png").download("canvas.png"),
            MenuItem::submenu(
                "Arrange",
                vec![
                    MenuItem::action("Bring to front", |_| {
                        tracing::info!("Bring to front clicked");
                    }),
                    MenuItem::action("Send to back", |_| tracing::info!("Send to back clicked")),
                ],
            ),
        ],
    )?;

    let element = menu
        .lock()
        .host()
        .query_selector("#canvas")
        .ok_or_else(|| CtxMenuError::target_not_found("#canvas"))?;

    // Right-click near the right edge so the submenu has to flip left.
    let mut trigger = PointerEvent::at(700.0, 80.0);
    menu.context_menu(element, &mut trigger);

    let arrange = menu
        .lock()
        .root()
        .and_then(|root| root.rows.get(4))
        .map(|row| row.rect.center())
        .ok_or_else(|| CtxMenuError::internal("menu did not render"))?;
    menu.pointer_move(arrange);
    menu.advance(Duration::from_millis(150));

    if let Some(snapshot) = menu.snapshot() {
        println!("{}", snapshot.to_json()?);
    }

    let copy = menu
        .lock()
        .root()
        .and_then(|root| root.rows.get(2))
        .map(|row| row.rect.center())
        .ok_or_else(|| CtxMenuError::internal("menu did not render"))?;
    menu.pointer_move(copy);
    menu.click_at(copy, &mut PointerEvent::at(copy.x, copy.y));

    menu.click_at(Point::new(10.0, 10.0), &mut PointerEvent::at(10.0, 10.0));
    tracing::info!(open = menu.is_open(), "Session finished");
    Ok(())
}
