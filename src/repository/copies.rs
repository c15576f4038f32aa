//! Book instance (copy) repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lending::CopyLedger,
    models::book_instance::{BookInstance, CopyStatus, CreateBookInstance, LoanedCopy},
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Copies of a book, earliest due date first
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let copies = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE book_id = $1 ORDER BY due_back NULLS LAST, id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Add a copy to a book with a fresh random id
    pub async fn create(&self, book_id: i32, copy: &CreateBookInstance) -> AppResult<BookInstance> {
        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&copy.imprint)
        .bind(copy.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Number of copies, and how many of them are available
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = $1) FROM book_instances",
        )
        .bind(CopyStatus::Available)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CopyLedger for CopiesRepository {
    async fn find(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let copy = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(copy)
    }

    async fn compare_and_set(
        &self,
        current: &BookInstance,
        next: &BookInstance,
    ) -> AppResult<Option<BookInstance>> {
        let stored = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = $5, borrower_id = $6, due_back = $7
            WHERE id = $1
              AND status = $2
              AND borrower_id IS NOT DISTINCT FROM $3
              AND due_back IS NOT DISTINCT FROM $4
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.status)
        .bind(current.borrower_id)
        .bind(current.due_back)
        .bind(next.status)
        .bind(next.borrower_id)
        .bind(next.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn on_loan(&self, borrower_id: Option<i32>) -> AppResult<Vec<LoanedCopy>> {
        let copies = sqlx::query_as::<_, LoanedCopy>(
            r#"
            SELECT bi.id, bi.book_id, b.title, bi.imprint, bi.due_back,
                   bi.borrower_id, u.username AS borrower_username
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            LEFT JOIN users u ON u.id = bi.borrower_id
            WHERE bi.status = $1
              AND ($2::int IS NULL OR bi.borrower_id = $2)
            ORDER BY bi.due_back NULLS LAST, bi.id
            "#,
        )
        .bind(CopyStatus::OnLoan)
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }
}
