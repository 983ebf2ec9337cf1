//! Tests for the validation overlay as driven through the grid.

use std::sync::Arc;

use horizon_grid::prelude::*;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Default)]
struct Contact {
    name: Option<String>,
    email: Option<String>,
}

fn contact(name: &str, email: &str) -> Contact {
    let cell = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Contact {
        name: cell(name),
        email: cell(email),
    }
}

fn columns() -> Vec<Column<Contact>> {
    vec![
        Column::text(
            "name",
            |c: &Contact| c.name.clone(),
            |c: &Contact, name| Contact { name, ..c.clone() },
        )
        .with_schema(ValidationSchema::new().required()),
        Column::text(
            "email",
            |c: &Contact| c.email.clone(),
            |c: &Contact, email| Contact { email, ..c.clone() },
        )
        .with_schema(
            ValidationSchema::new()
                .pattern(r"^[^@\s]+@[^@\s]+$")
                .unwrap(),
        ),
    ]
}

/// Every failing cell has an entry and no passing cell does.
fn assert_consistent(grid: &DataGrid<Contact>) {
    for (row, data) in grid.data().iter().enumerate() {
        for (col, column) in grid.columns().iter().enumerate() {
            assert_eq!(
                grid.validation_errors().get(row, col).map(str::to_string),
                column.validate(data),
                "row {row}, column {col}"
            );
        }
        if grid.columns().iter().all(|c| c.validate(data).is_none()) {
            assert!(grid.validation_errors().row(row).is_none(), "row {row} not pruned");
        }
    }
    assert!(
        grid.validation_errors()
            .iter()
            .all(|(row, _, _)| row < grid.row_count())
    );
}

#[test]
fn test_blank_edit_then_paste_clears_error() {
    let data = vec![
        contact("Ada", "ada@example.com"),
        contact("Grace", "grace@example.com"),
        contact("Alan", "alan@example.com"),
    ];
    let mut grid = DataGrid::new(columns(), data);
    let emitted: Arc<Mutex<Vec<Arc<Vec<Contact>>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&emitted);
    grid.changed.connect(move |change| sink.lock().push(Arc::clone(&change.data)));

    // Type an empty value into row 1, column A, then blur.
    grid.set_active_cell("name", 1).unwrap();
    assert!(grid.key_down(&KeyEvent::new(Key::Enter, KeyboardModifiers::NONE)));
    let edited = contact("", "grace@example.com");
    grid.update_row(1, edited);
    grid.focus_lost();

    assert_eq!(grid.validation_errors().get(1, 0), Some("Required"));
    assert_eq!(grid.validation_errors().error_count(), 1);

    // Paste "x\ny" into rows 0-1 of column A.
    grid.set_selection(Some((Position::new(0, 0), Position::new(0, 1))));
    let operations = grid.paste(&ClipboardPayload::text("x\ny")).unwrap();
    assert_eq!(operations, vec![Operation::update(0, 2)]);

    assert_eq!(grid.validation_errors().get(1, 0), None);
    assert!(grid.validation_errors().is_empty());

    let last = emitted.lock().last().cloned().unwrap();
    let names: Vec<_> = last.iter().map(|c| c.name.as_deref()).collect();
    assert_eq!(names, vec![Some("x"), Some("y"), Some("Alan")]);
}

#[test]
fn test_overlay_stays_consistent_across_operations() {
    let data = vec![
        contact("a", "a@x"),
        contact("", "bad"),
        contact("c", ""),
        contact("", ""),
        contact("e", "nope"),
    ];
    let mut grid =
        DataGrid::new(columns(), data).with_row_factory(RowFactory::from_default());
    assert_consistent(&grid);
    assert!(grid.validation_errors().get(1, 1).unwrap().starts_with("Must match"));

    grid.insert_rows_after(0, 2);
    assert_consistent(&grid);

    grid.delete_rows(2, 3);
    assert_consistent(&grid);

    grid.set_selection(Some((Position::new(0, 0), Position::new(1, 2))));
    grid.paste(&ClipboardPayload::text("z\tz@z")).unwrap();
    assert_consistent(&grid);

    grid.duplicate_rows(3, 4);
    assert_consistent(&grid);

    grid.set_selection(Some((Position::new(1, 0), Position::new(1, grid.row_count() - 1))));
    grid.delete_selection(false);
    assert_consistent(&grid);

    grid.set_active_cell(0, grid.row_count() - 1).unwrap();
    grid.paste(&ClipboardPayload::text("p\nq\nr")).unwrap();
    assert_consistent(&grid);

    grid.delete_rows(0, grid.row_count() - 1);
    assert!(grid.validation_errors().is_empty());
}

#[test]
fn test_validation_signal_fires_only_on_change() {
    let mut grid = DataGrid::new(columns(), vec![contact("a", "a@x"), contact("b", "b@x")]);
    let counts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);
    grid.validation_changed
        .connect(move |errors: &ValidationErrors| sink.lock().push(errors.error_count()));

    grid.update_row(0, contact("a2", "a@x"));
    assert!(counts.lock().is_empty());

    grid.update_row(1, contact("", "b@x"));
    grid.update_row(0, contact("a3", "broken"));
    assert_eq!(*counts.lock(), vec![1, 2]);
}

#[test]
fn test_invalid_data_is_still_accepted() {
    let mut grid = DataGrid::new(columns(), vec![contact("a", "a@x")]);
    grid.set_active_cell("email", 0).unwrap();
    let operations = grid.paste(&ClipboardPayload::text("not an email")).unwrap();
    assert_eq!(operations.len(), 1);
    assert_eq!(grid.data()[0].email.as_deref(), Some("not an email"));
    assert!(grid.validation_errors().get(0, 1).is_some());
}
