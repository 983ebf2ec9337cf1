//! Tests for pointer and keyboard interaction as seen by a host.

use std::sync::Arc;

use horizon_grid::prelude::*;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Default)]
struct Task {
    title: Option<String>,
    owner: Option<String>,
    done: bool,
}

fn task(title: &str, owner: &str) -> Task {
    Task {
        title: Some(title.to_string()),
        owner: Some(owner.to_string()),
        done: false,
    }
}

fn columns() -> Vec<Column<Task>> {
    vec![
        Column::text(
            "title",
            |t: &Task| t.title.clone(),
            |t: &Task, title| Task { title, ..t.clone() },
        ),
        Column::text(
            "owner",
            |t: &Task| t.owner.clone(),
            |t: &Task, owner| Task { owner, ..t.clone() },
        ),
        Column::checkbox(
            "done",
            |t: &Task| t.done,
            |t: &Task, done| Task { done, ..t.clone() },
        ),
    ]
}

/// Gutter 40, three columns of 100, header and rows of 40, 400x200 viewport.
fn board(rows: usize) -> DataGrid<Task> {
    let data = (0..rows).map(|i| task(&format!("task {i}"), "sam")).collect();
    DataGrid::new(columns(), data)
        .with_row_factory(RowFactory::from_default())
        .with_viewport(Viewport::new(Rect::new(0.0, 0.0, 400.0, 200.0), Point::ZERO))
}

fn at(col: usize, row: usize) -> PointerEvent {
    PointerEvent::primary(90.0 + col as f32 * 100.0, 60.0 + row as f32 * 40.0)
}

fn key(key: Key) -> KeyEvent {
    KeyEvent::new(key, KeyboardModifiers::NONE)
}

/// Log signal emissions in order, tagged by signal.
fn journal(grid: &DataGrid<Task>) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    grid.changed.connect(move |change: &GridChange<Task>| {
        sink.lock().push(format!("changed {:?}", change.operations))
    });
    let sink = Arc::clone(&log);
    grid.active_cell_changed.connect(move |active: &Option<Position>| {
        sink.lock().push(format!("active {active:?}"))
    });
    let sink = Arc::clone(&log);
    grid.selection_changed
        .connect(move |_: &Option<Selection>| sink.lock().push("selection".to_string()));
    let sink = Arc::clone(&log);
    grid.editing_changed
        .connect(move |editing: &bool| sink.lock().push(format!("editing {editing}")));
    log
}

#[test]
fn test_selection_normalizes_any_corners() {
    let corners: Vec<Position> = (0..3)
        .flat_map(|col| (0..4).map(move |row| Position::new(col, row)))
        .collect();

    for &a in &corners {
        for &b in &corners {
            let mut grid = board(4);
            grid.set_selection(Some((a, b)));
            let selection = grid.get_selection().unwrap();
            assert_eq!(selection.min, Position::new(a.col.min(b.col), a.row.min(b.row)));
            assert_eq!(selection.max, Position::new(a.col.max(b.col), a.row.max(b.row)));
            assert!(selection.contains(a) && selection.contains(b));
            assert_eq!(grid.get_active_cell(), Some(a));

            // Dragging from a to b gives the same rectangle.
            let mut dragged = board(4);
            dragged.pointer_down(&at(a.col, a.row));
            dragged.pointer_move(&at(b.col, b.row));
            dragged.pointer_up(&at(b.col, b.row));
            assert_eq!(dragged.get_selection(), Some(selection), "{a:?} -> {b:?}");
        }
    }
}

#[test]
fn test_click_type_and_commit_with_auto_add() {
    let mut grid = board(3).with_options(GridOptions::default().with_auto_add_row(true));
    let log = journal(&grid);

    grid.pointer_down(&at(0, 2));
    grid.pointer_up(&at(0, 2));
    assert!(grid.key_down(&KeyEvent::character('w')));
    assert_eq!(grid.edit_seed(), Some("w"));

    // The host's editor commits the text before Enter reaches the grid.
    grid.update_row(2, task("write docs", "sam"));
    log.lock().clear();
    assert!(grid.key_down(&key(Key::Enter)));

    assert_eq!(grid.row_count(), 4);
    assert_eq!(grid.get_active_cell(), Some(Position::new(0, 3)));
    assert!(!grid.is_editing());
    assert_eq!(grid.state().last_edited(), Some(Position::new(0, 2)));
    assert_eq!(
        *log.lock(),
        vec![
            "editing false".to_string(),
            format!("changed {:?}", vec![Operation::create(3, 4)]),
            format!("active {:?}", Some(Position::new(0, 3))),
            "selection".to_string(),
        ]
    );
}

#[test]
fn test_paste_reports_data_before_selection() {
    let mut grid = board(3);
    grid.set_active_cell("owner", 0).unwrap();
    let log = journal(&grid);

    grid.paste(&ClipboardPayload::text("kim\nlee")).unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            format!("changed {:?}", vec![Operation::update(0, 2)]),
            "selection".to_string(),
        ]
    );
    assert_eq!(grid.interaction(), Interaction::RangeSelected);
}

#[test]
fn test_tab_walks_cells_and_leaves_grid() {
    let mut grid = board(2);
    let exits = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&exits);
    grid.focus_exit
        .connect(move |direction: &FocusDirection| sink.lock().push(*direction));

    grid.set_active_cell(0, 0).unwrap();
    let mut visited = vec![grid.get_active_cell().unwrap()];
    while grid.key_down(&key(Key::Tab)) {
        visited.push(grid.get_active_cell().unwrap());
    }
    assert_eq!(visited.len(), 6);
    assert_eq!(visited[3], Position::new(0, 1));
    assert_eq!(grid.interaction(), Interaction::Idle);

    grid.set_active_cell(0, 0).unwrap();
    let back = KeyEvent::new(Key::Tab, KeyboardModifiers::SHIFT);
    assert!(!grid.key_down(&back));
    assert_eq!(*exits.lock(), vec![FocusDirection::Next, FocusDirection::Previous]);
}

#[test]
fn test_keyboard_navigation_scrolls_into_view() {
    let mut grid = board(20);
    let scrolls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&scrolls);
    grid.scroll_requested
        .connect(move |offset: &Point| sink.lock().push(*offset));

    grid.set_active_cell(0, 0).unwrap();
    for _ in 0..5 {
        grid.key_down(&key(Key::ArrowDown));
    }
    assert_eq!(grid.get_active_cell(), Some(Position::new(0, 5)));
    assert_eq!(
        *scrolls.lock(),
        vec![Point::new(0.0, 40.0), Point::new(0.0, 80.0)]
    );

    // Ctrl+Up jumps to the top and scrolls back.
    grid.key_down(&KeyEvent::new(Key::ArrowUp, KeyboardModifiers::CTRL));
    assert_eq!(grid.get_active_cell(), Some(Position::new(0, 0)));
    assert_eq!(grid.viewport().scroll, Point::ZERO);
}

#[test]
fn test_pointer_events_follow_scroll() {
    let mut grid = board(20);
    let mut viewport = *grid.viewport();
    viewport.scroll = Point::new(0.0, 400.0);
    grid.set_viewport(viewport);

    // Body rows move with the scroll, the header does not.
    grid.pointer_down(&at(1, 0));
    grid.pointer_up(&at(1, 0));
    assert_eq!(grid.get_active_cell(), Some(Position::new(1, 10)));

    grid.pointer_down(&PointerEvent::primary(190.0, 20.0));
    let selection = grid.get_selection().unwrap();
    assert_eq!(selection.min, Position::new(1, 0));
    assert_eq!(selection.max, Position::new(1, 19));
}

#[test]
fn test_options_from_toml() {
    let options = GridOptions::from_toml_str(
        r#"
        lock_rows = true
        row_height = 30.0
        ragged_paste = "reject"
        "#,
    )
    .unwrap();
    assert!(options.lock_rows);
    assert_eq!(options.ragged_paste, RaggedPaste::Reject);
    assert_eq!(options.header_row_height, 40.0);
    assert!(options.smart_delete);

    let mut grid = board(10).with_options(options);
    assert!(grid.add_rows(1).is_empty());
    assert_eq!(grid.row_count(), 10);

    // 160px of body fits five 30px rows.
    grid.set_active_cell(0, 0).unwrap();
    grid.key_down(&key(Key::PageDown));
    assert_eq!(grid.get_active_cell(), Some(Position::new(0, 5)));

    let err = GridOptions::from_toml_str("row_height = \"tall\"").unwrap_err();
    assert!(err.to_string().contains("grid options"));
}

#[test]
fn test_context_menu_round_trip() {
    let mut grid = board(4);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&requests);
    grid.context_menu_requested
        .connect(move |request: &ContextMenuRequest| sink.lock().push(request.clone()));

    assert!(grid.pointer_down(&PointerEvent::secondary(190.0, 140.0)));
    let request = requests.lock()[0].clone();
    assert_eq!(request.cell, Cell::new(1, 2));
    assert_eq!(
        request.items,
        vec![
            ContextMenuItem::InsertRowBelow(2),
            ContextMenuItem::DuplicateRow(2),
            ContextMenuItem::DeleteRow(2),
        ]
    );

    let operations = grid.apply_context_menu_item(request.items[2]);
    assert_eq!(operations, vec![Operation::delete(2, 3)]);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.data()[2].title.as_deref(), Some("task 3"));
}
