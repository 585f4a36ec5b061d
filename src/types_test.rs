use super::*;
use serde_json::json;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_parses_known_values() {
    assert_eq!(serde_json::from_value::<Role>(json!("ADMIN")).unwrap(), Role::Admin);
    assert_eq!(serde_json::from_value::<Role>(json!("READER")).unwrap(), Role::Reader);
}

#[test]
fn role_keeps_unknown_value_verbatim() {
    let role = serde_json::from_value::<Role>(json!("USER")).unwrap();
    assert_eq!(role, Role::Other("USER".into()));
    assert_eq!(serde_json::to_value(&role).unwrap(), json!("USER"));
    assert!(!role.is_admin());
}

#[test]
fn role_is_case_sensitive() {
    let role = serde_json::from_value::<Role>(json!("admin")).unwrap();
    assert!(!role.is_admin());
}

#[test]
fn only_admin_role_is_admin() {
    assert!(Role::Admin.is_admin());
    assert!(!Role::Reader.is_admin());
}

// =============================================================================
// Envelope + login payload
// =============================================================================

#[test]
fn envelope_missing_fields_default() {
    let env: ApiEnvelope<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
    assert!(!env.success);
    assert!(env.message.is_none());
    assert!(env.data.is_none());
}

#[test]
fn login_data_splits_into_user_and_token() {
    let data: LoginData = serde_json::from_value(json!({
        "token": "tok123",
        "type": "Bearer",
        "id": 1,
        "username": "alice",
        "name": "Alice",
        "role": "ADMIN"
    }))
    .unwrap();
    let (user, token) = data.into_parts();
    assert_eq!(token, "tok123");
    assert_eq!(user.id, 1);
    assert_eq!(user.username, "alice");
    assert_eq!(user.display_name, "Alice");
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn user_summary_serializes_display_name_as_name() {
    let user = UserSummary { id: 7, username: "bob".into(), display_name: "Bob".into(), role: Role::Reader };
    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        json!({ "id": 7, "username": "bob", "name": "Bob", "role": "READER" })
    );
}

// =============================================================================
// Books + borrows
// =============================================================================

#[test]
fn book_page_decodes_spring_shape() {
    let page: Page<Book> = serde_json::from_value(json!({
        "content": [{
            "id": 3,
            "isbn": "978-7-111",
            "title": "Rust in Action",
            "author": "T. McNamara",
            "category": "Programming",
            "status": "AVAILABLE",
            "totalCopies": 2,
            "availableCopies": 1,
            "publishDate": "2021-08-01"
        }],
        "totalElements": 1,
        "totalPages": 1,
        "number": 0,
        "size": 10,
        "pageable": { "sort": {} }
    }))
    .unwrap();
    assert_eq!(page.total_elements, 1);
    let book = &page.content[0];
    assert_eq!(book.status, Some(BookStatus::Available));
    assert_eq!(book.available_copies, 1);
    assert_eq!(book.publish_date.as_deref(), Some("2021-08-01"));
}

#[test]
fn borrow_status_from_str_ignores_case() {
    assert_eq!("pending".parse::<BorrowStatus>().unwrap(), BorrowStatus::Pending);
    assert_eq!(" Overdue ".parse::<BorrowStatus>().unwrap(), BorrowStatus::Overdue);
    assert!("lost".parse::<BorrowStatus>().is_err());
}

#[test]
fn borrow_request_omits_missing_due_date() {
    let req = BorrowRequest { book_id: 5, due_date: None };
    assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "bookId": 5 }));
}
