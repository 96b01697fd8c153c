// Table definitions for the externally owned wiki schema.
// This tool reads (and lightly maintains) these tables; it does not create them.

diesel::table! {
    page (id) {
        id -> Integer,
        title -> Text,
        project_id -> Nullable<Integer>,
        views -> Integer,
        status -> Text,
        namespace_id -> Nullable<Integer>,
        text -> Text,
        created_at -> Nullable<Text>,
        updated_at -> Nullable<Text>,
    }
}

diesel::table! {
    project (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    namespace (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    category (id) {
        id -> Integer,
        name -> Text,
        text_content -> Text,
        status -> Text,
    }
}

diesel::table! {
    page_category (page_id, category_id) {
        page_id -> Integer,
        category_id -> Integer,
    }
}

diesel::table! {
    edit (id) {
        id -> Integer,
        page_id -> Integer,
        editor -> Nullable<Text>,
        edited_at -> Nullable<Text>,
    }
}

diesel::table! {
    page_view (id) {
        id -> Integer,
        page_id -> Integer,
        viewed_at -> Nullable<Text>,
    }
}

diesel::table! {
    comment (id) {
        id -> Integer,
        page_id -> Integer,
        body -> Nullable<Text>,
        created_at -> Nullable<Text>,
    }
}

diesel::joinable!(page -> project (project_id));
diesel::joinable!(page -> namespace (namespace_id));
diesel::joinable!(page_category -> page (page_id));
diesel::joinable!(page_category -> category (category_id));
diesel::joinable!(edit -> page (page_id));
diesel::joinable!(page_view -> page (page_id));
diesel::joinable!(comment -> page (page_id));

diesel::allow_tables_to_appear_in_same_query!(
    page,
    project,
    namespace,
    category,
    page_category,
    edit,
    page_view,
    comment,
);
