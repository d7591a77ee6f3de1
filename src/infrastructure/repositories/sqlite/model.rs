// src/infrastructure/repositories/sqlite/model.rs

use chrono::NaiveDateTime;
use diesel::sql_types::{BigInt, Text};
use diesel::{Identifiable, Insertable, Queryable, QueryableByName};

/// A bookmark row as stored. Field order follows the table definition;
/// `site_name` sits last because it was added by a later migration.
#[derive(Queryable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbBookmark {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub url: String,
    pub url_norm: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub note: Option<String>,
    pub status: String,
    pub http_status: Option<i32>,
    pub error_message: Option<String>,
    pub site_name: Option<String>,
}

/// New bookmark for insertion; the id comes from the database.
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
pub struct NewBookmark {
    pub created_at: NaiveDateTime,
    pub url: String,
    pub url_norm: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
    pub note: Option<String>,
    pub status: String,
    pub http_status: Option<i32>,
    pub error_message: Option<String>,
    pub site_name: Option<String>,
}

/// Tag frequency row produced by the tag aggregation query.
#[derive(QueryableByName, Debug)]
pub struct TagsFrequency {
    #[diesel(sql_type = Text)]
    pub tag: String,

    #[diesel(sql_type = BigInt)]
    pub n: i64,
}
