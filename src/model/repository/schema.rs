diesel::table! {
    MediaAsset (asset_id) {
        asset_id -> BigInt,
        ty -> Integer,
        title -> Text,
        description -> Text,
        owner_email -> Text,
        media_url -> Text,
        alt_text -> Nullable<Text>,
        format -> Nullable<Text>,
        transform_crop -> Nullable<Integer>,
        transform_fit -> Nullable<Text>,
        thumbnail_url -> Nullable<Text>,
        duration_secs -> Nullable<Double>,
        controls -> Nullable<Integer>,
        transform_width -> Integer,
        transform_height -> Integer,
        transform_quality -> Integer,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

diesel::table! {
    User (user_id) {
        user_id -> BigInt,
        email -> Text,
        password_hash -> Text,
        created_at -> BigInt,
    }
}
