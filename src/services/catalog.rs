//! Catalog service: books, authors, genres, languages and copies

use uuid::Uuid;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, AuthorForm},
        book::{Book, BookDetails, BookForm, BookShort, CatalogSummary, WordMatches},
        book_instance::{BookInstance, CopyStatus, CreateBookInstance},
        genre::{Genre, Language, NameForm},
        user::{Permission, UserClaims},
    },
    repository::Repository,
};

/// Largest page a client may ask for
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalize 1-based page number and page size
pub fn page_bounds(page: Option<i64>, per_page: Option<i64>, default_size: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    pub fn page_size(&self) -> i64 {
        self.config.page_size
    }

    // Summary

    /// Home page counts; also counts this visit in the caller's session
    pub async fn summary(&self, actor: &UserClaims, word: Option<&str>) -> AppResult<CatalogSummary> {
        let num_books = self.repository.books.count().await?;
        let num_authors = self.repository.authors.count().await?;
        let (num_instances, num_instances_available) = self.repository.copies.counts().await?;

        let matches = match word.map(str::trim).filter(|w| !w.is_empty()) {
            Some(word) => {
                let (num_books, num_genres) = self.repository.books.count_matching(word).await?;
                Some(WordMatches {
                    word: word.to_string(),
                    num_books,
                    num_genres,
                })
            }
            None => None,
        };

        let num_visits = self.repository.sessions.record_visit(actor.sid).await?;

        Ok(CatalogSummary {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_visits,
            matches,
        })
    }

    // Books

    pub async fn list_books(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    /// Book with its author, language, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => self.repository.authors.find(author_id).await?,
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => self.repository.languages.find(language_id).await?,
            None => None,
        };
        let genres = self.repository.genres.for_book(book.id).await?;
        let copies = self.repository.copies.for_book(book.id).await?;

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            description: book.description,
            isbn: book.isbn,
            author,
            language,
            genres,
            copies,
        })
    }

    /// Referenced author, language and genres must exist
    async fn check_references(&self, book: &BookForm) -> AppResult<()> {
        if let Some(author_id) = book.author_id {
            if self.repository.authors.find(author_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Unknown author {}", author_id)));
            }
        }

        if let Some(language_id) = book.language_id {
            if self.repository.languages.find(language_id).await?.is_none() {
                return Err(AppError::BadRequest(format!("Unknown language {}", language_id)));
            }
        }

        let genre_ids = book.distinct_genre_ids();
        if !genre_ids.is_empty() {
            let found = self.repository.genres.count_existing(&genre_ids).await?;
            if found != genre_ids.len() as i64 {
                return Err(AppError::BadRequest("Unknown genre in genre_ids".to_string()));
            }
        }

        Ok(())
    }

    pub async fn create_book(&self, actor: &UserClaims, book: BookForm) -> AppResult<Book> {
        actor.require(Permission::AddBook)?;
        self.check_references(&book).await?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Book {} \"{}\" created by {}", created.id, created.title, actor.sub);
        Ok(created)
    }

    pub async fn update_book(&self, actor: &UserClaims, id: i32, book: BookForm) -> AppResult<Book> {
        actor.require(Permission::ChangeBook)?;
        self.check_references(&book).await?;

        let updated = self.repository.books.update(id, &book).await?;
        tracing::info!("Book {} updated by {}", id, actor.sub);
        Ok(updated)
    }

    pub async fn delete_book(&self, actor: &UserClaims, id: i32, force: bool) -> AppResult<()> {
        actor.require(Permission::DeleteBook)?;

        self.repository.books.delete(id, force).await?;
        tracing::info!("Book {} deleted by {} (force={})", id, actor.sub, force);
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, per_page).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create_author(&self, actor: &UserClaims, author: AuthorForm) -> AppResult<Author> {
        actor.require(Permission::AddAuthor)?;

        let created = self.repository.authors.create(&author).await?;
        tracing::info!("Author {} \"{}\" created by {}", created.id, created, actor.sub);
        Ok(created)
    }

    pub async fn update_author(
        &self,
        actor: &UserClaims,
        id: i32,
        author: AuthorForm,
    ) -> AppResult<Author> {
        actor.require(Permission::ChangeAuthor)?;
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author; their books are kept without an author
    pub async fn delete_author(&self, actor: &UserClaims, id: i32) -> AppResult<()> {
        actor.require(Permission::DeleteAuthor)?;

        self.repository.authors.delete(id).await?;
        tracing::info!("Author {} deleted by {}", id, actor.sub);
        Ok(())
    }

    // Genres and languages

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, actor: &UserClaims, form: NameForm) -> AppResult<Genre> {
        actor.require(Permission::ChangeBook)?;
        self.repository.genres.create(form.name.trim()).await
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, actor: &UserClaims, form: NameForm) -> AppResult<Language> {
        actor.require(Permission::ChangeBook)?;
        self.repository.languages.create(form.name.trim()).await
    }

    // Copies

    /// Add a copy to a book. New copies cannot start on loan.
    pub async fn create_copy(
        &self,
        actor: &UserClaims,
        book_id: i32,
        copy: CreateBookInstance,
    ) -> AppResult<BookInstance> {
        actor.require(Permission::ChangeBook)?;

        if copy.status == Some(CopyStatus::OnLoan) {
            return Err(AppError::BadRequest(
                "A new copy cannot start on loan; borrow it instead".to_string(),
            ));
        }
        self.repository.books.get_by_id(book_id).await?;

        let created = self.repository.copies.create(book_id, &copy).await?;
        tracing::info!("Copy {} of book {} created by {}", created.id, book_id, actor.sub);
        Ok(created)
    }

    pub async fn delete_copy(&self, actor: &UserClaims, id: Uuid) -> AppResult<()> {
        actor.require(Permission::ChangeBook)?;

        self.repository.copies.delete(id).await?;
        tracing::info!("Copy {} deleted by {}", id, actor.sub);
        Ok(())
    }
}
