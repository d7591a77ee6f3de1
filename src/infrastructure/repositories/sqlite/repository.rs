// src/infrastructure/repositories/sqlite/repository.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Nullable};
use diesel::sqlite::Sqlite;
use tracing::{debug, error, instrument};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainResult;
use crate::domain::repositories::query::{BookmarkListQuery, ListPage, TagCount};
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::tag::Tag;
use crate::infrastructure::repositories::sqlite::model::{DbBookmark, NewBookmark, TagsFrequency};
use crate::infrastructure::repositories::sqlite::schema::bookmarks;
use crate::infrastructure::repositories::sqlite::schema::bookmarks::dsl;

/// A reusable WHERE clause over the bookmarks table.
type BookmarkFilter = Box<dyn BoxableExpression<bookmarks::table, Sqlite, SqlType = Nullable<Bool>>>;

#[derive(Clone, Debug)]
pub struct SqliteBookmarkRepository {
    pool: ConnectionPool,
}

impl SqliteBookmarkRepository {
    /// Create a new SQLite repository with the provided connection pool
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite repository with the provided database URL,
    /// running pending migrations in the process.
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    #[instrument(skip_all, level = "debug")]
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    /// Convert a database row to a domain entity
    fn to_domain_model(&self, db_bookmark: DbBookmark) -> SqliteResult<Bookmark> {
        let id = db_bookmark.id;
        let created_at = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.created_at, Utc);

        Bookmark::from_storage(
            id,
            created_at,
            db_bookmark.url,
            db_bookmark.url_norm,
            db_bookmark.title,
            db_bookmark.description,
            db_bookmark.image_url,
            db_bookmark.site_name,
            db_bookmark.tags,
            db_bookmark.note,
            &db_bookmark.status,
            db_bookmark.http_status,
            db_bookmark.error_message,
        )
        .map_err(|e| {
            SqliteRepositoryError::ConversionError(format!(
                "Failed to build domain bookmark from row {}: {}",
                id, e
            ))
        })
    }

    /// Convert a domain entity to its insertable form
    fn to_insert_model(bookmark: &Bookmark) -> NewBookmark {
        NewBookmark {
            created_at: bookmark.created_at.naive_utc(),
            url: bookmark.url.clone(),
            url_norm: bookmark.url_norm.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone(),
            image_url: bookmark.image_url.clone(),
            tags: bookmark.tags_string(),
            note: bookmark.note.clone(),
            status: bookmark.status.as_str().to_string(),
            http_status: bookmark.http_status.map(i32::from),
            error_message: bookmark.error_message.clone(),
            site_name: bookmark.site_name.clone(),
        }
    }

    /// Build the WHERE clause for a listing query, or `None` when the
    /// query has no filters. Built fresh for each use since boxed
    /// expressions cannot be cloned.
    fn listing_filter(query: &BookmarkListQuery) -> Option<BookmarkFilter> {
        let mut filter: Option<BookmarkFilter> = None;

        if let Some(text) = &query.query {
            let pattern = format!("%{}%", text);
            let clause: BookmarkFilter = Box::new(
                dsl::title
                    .like(pattern.clone())
                    .or(dsl::description.like(pattern.clone()))
                    .or(dsl::url.like(pattern.clone()).nullable())
                    .or(dsl::tags.like(pattern.clone()))
                    .or(dsl::note.like(pattern)),
            );
            filter = Some(clause);
        }

        if let Some(tag) = &query.tag {
            // Whole-token match against the comma-joined canonical list:
            // only, first, last, or somewhere in the middle.
            let token = tag.value();
            let clause: BookmarkFilter = Box::new(
                dsl::tags
                    .eq(token.to_string())
                    .or(dsl::tags.like(format!("{},%", token)))
                    .or(dsl::tags.like(format!("%,{}", token)))
                    .or(dsl::tags.like(format!("%,{},%", token))),
            );
            filter = Some(match filter {
                Some(existing) => Box::new(existing.and(clause)),
                None => clause,
            });
        }

        filter
    }
}

impl BookmarkRepository for SqliteBookmarkRepository {
    #[instrument(skip_all, level = "debug")]
    fn insert(&self, bookmark: &Bookmark) -> DomainResult<Bookmark> {
        let mut conn = self.get_connection()?;

        let new_bookmark = Self::to_insert_model(bookmark);
        debug!("Inserting bookmark for {}", new_bookmark.url_norm);

        let row = diesel::insert_into(dsl::bookmarks)
            .values(&new_bookmark)
            .get_result::<DbBookmark>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(self.to_domain_model(row)?)
    }

    #[instrument(skip_all, level = "debug")]
    fn get_by_id(&self, id: i32) -> DomainResult<Option<Bookmark>> {
        let mut conn = self.get_connection()?;

        let result = dsl::bookmarks
            .filter(dsl::id.eq(id))
            .first::<DbBookmark>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match result {
            Some(db_bookmark) => {
                let bookmark = self.to_domain_model(db_bookmark)?;
                Ok(Some(bookmark))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn list(&self, query: &BookmarkListQuery) -> DomainResult<ListPage> {
        let mut conn = self.get_connection()?;

        // The total spans every match, not just the requested page.
        let total = match Self::listing_filter(query) {
            Some(filter) => dsl::bookmarks.filter(filter).count().get_result::<i64>(&mut conn),
            None => dsl::bookmarks.count().get_result::<i64>(&mut conn),
        }
        .map_err(SqliteRepositoryError::DatabaseError)?;

        let mut page_query = dsl::bookmarks.into_boxed();
        if let Some(filter) = Self::listing_filter(query) {
            page_query = page_query.filter(filter);
        }

        // id breaks created_at ties so pagination stays deterministic.
        let db_bookmarks = page_query
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(query.limit)
            .offset(query.offset)
            .load::<DbBookmark>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        let items = db_bookmarks
            .into_iter()
            .filter_map(|db_bookmark| match self.to_domain_model(db_bookmark) {
                Ok(bookmark) => Some(bookmark),
                Err(e) => {
                    error!("Failed to convert bookmark: {}", e);
                    None
                }
            })
            .collect();

        Ok(ListPage {
            items,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    #[instrument(skip_all, level = "debug")]
    fn delete(&self, id: i32) -> DomainResult<bool> {
        let mut conn = self.get_connection()?;

        // Surviving rows keep their ids; deleted ids are never reused.
        let deleted = diesel::delete(dsl::bookmarks.filter(dsl::id.eq(id)))
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(deleted > 0)
    }

    #[instrument(skip_all, level = "debug")]
    fn tag_counts(&self) -> DomainResult<Vec<TagCount>> {
        let mut conn = self.get_connection()?;

        // Split the comma-joined tag lists and count occurrences per tag.
        let query = "
            WITH RECURSIVE split(tag, rest) AS (
                SELECT '', tags || ','
                FROM bookmarks
                WHERE tags IS NOT NULL AND tags <> ''
                UNION ALL
                SELECT substr(rest, 0, instr(rest, ',')),
                       substr(rest, instr(rest, ',') + 1)
                FROM split
                WHERE rest <> '')
            SELECT tag, count(tag) as n
            FROM split
            WHERE tag <> ''
            GROUP BY tag
            ORDER BY n DESC, tag ASC;
        ";

        let tag_frequencies: Vec<TagsFrequency> = sql_query(query)
            .load(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        let mut result = Vec::new();
        for tf in tag_frequencies {
            match Tag::new(&tf.tag) {
                Ok(tag) => result.push(TagCount { tag, n: tf.n }),
                Err(e) => error!("Failed to create tag '{}': {}", tf.tag, e),
            }
        }

        Ok(result)
    }

    #[instrument(skip_all, level = "debug")]
    fn check_health(&self) -> DomainResult<()> {
        let mut conn = self.get_connection()?;

        sql_query("SELECT 1")
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(())
    }
}
