diesel::table! {
    tickets (id) {
        id -> Text,
        name -> Text,
        description -> Text,
        error_message -> Nullable<Text>,
        department -> Text,
        severity -> Text,
        status -> Text,
        assignee -> Nullable<Text>,
        screenshot_url -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        resolved_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    classifications (id) {
        id -> Text,
        ticket_id -> Text,
        confidence -> Double,
        reasoning -> Text,
        suggested_actions -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(classifications -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, classifications);
