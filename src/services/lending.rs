//! Borrow, renewal and return of copies

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lending::{
        due_date::latest_due_date, transition, Clock, CopyLedger, LendingError, LendingFlow,
    },
    models::{
        book_instance::{BookInstance, DueDateProposal, LoanedCopy},
        user::{Permission, UserClaims},
    },
};

#[derive(Clone)]
pub struct LendingService {
    ledger: Arc<dyn CopyLedger>,
    clock: Arc<dyn Clock>,
}

impl LendingService {
    pub fn new(ledger: Arc<dyn CopyLedger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    async fn load(&self, id: Uuid) -> AppResult<BookInstance> {
        self.ledger
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy {} not found", id)))
    }

    /// Persist `next` if the stored copy still matches `current`.
    /// `lost_race` is reported when another request got there first.
    async fn commit(
        &self,
        current: &BookInstance,
        next: BookInstance,
        lost_race: LendingError,
    ) -> AppResult<BookInstance> {
        match self.ledger.compare_and_set(current, &next).await? {
            Some(stored) => Ok(stored),
            None => {
                tracing::info!("Copy {} changed concurrently, {}", current.id, lost_race);
                Err(lost_race.into())
            }
        }
    }

    async fn proposal(&self, id: Uuid, flow: LendingFlow) -> AppResult<DueDateProposal> {
        let copy = self.load(id).await?;
        let today = self.today();
        Ok(DueDateProposal {
            copy,
            proposed_due_back: flow.proposed_due_date(today),
            earliest_due_back: today,
            latest_due_back: latest_due_date(today),
        })
    }

    /// Date range and default offered before borrowing
    pub async fn borrow_proposal(&self, id: Uuid) -> AppResult<DueDateProposal> {
        self.proposal(id, LendingFlow::Borrow).await
    }

    /// Date range and default offered before renewing
    pub async fn renewal_proposal(
        &self,
        actor: &UserClaims,
        id: Uuid,
    ) -> AppResult<DueDateProposal> {
        actor.require(Permission::CanMarkReturned)?;
        self.proposal(id, LendingFlow::Renewal).await
    }

    /// Borrow an available copy for the acting user
    pub async fn borrow(
        &self,
        actor: &UserClaims,
        id: Uuid,
        requested: Option<NaiveDate>,
    ) -> AppResult<BookInstance> {
        let due = LendingFlow::Borrow.resolve(requested, self.today())?;
        let copy = self.load(id).await?;
        let next = transition::borrow(&copy, actor.user_id, due)?;

        let stored = self.commit(&copy, next, LendingError::CopyUnavailable).await?;
        tracing::info!(
            "Copy {} borrowed by user {} until {}",
            stored.id,
            actor.user_id,
            due.date()
        );
        Ok(stored)
    }

    /// Move the due date of a copy on loan (librarians only)
    pub async fn renew(
        &self,
        actor: &UserClaims,
        id: Uuid,
        requested: Option<NaiveDate>,
    ) -> AppResult<BookInstance> {
        actor.require(Permission::CanMarkReturned)?;

        let due = LendingFlow::Renewal.resolve(requested, self.today())?;
        let copy = self.load(id).await?;
        let next = transition::renew(&copy, due)?;

        let stored = self.commit(&copy, next, LendingError::NotOnLoan).await?;
        tracing::info!("Copy {} renewed until {} by user {}", stored.id, due.date(), actor.user_id);
        Ok(stored)
    }

    /// Put a copy on loan back on the shelf (librarians only)
    pub async fn mark_returned(&self, actor: &UserClaims, id: Uuid) -> AppResult<BookInstance> {
        actor.require(Permission::CanMarkReturned)?;

        let copy = self.load(id).await?;
        let next = transition::mark_returned(&copy)?;

        let stored = self.commit(&copy, next, LendingError::NotOnLoan).await?;
        tracing::info!("Copy {} returned, marked by user {}", stored.id, actor.user_id);
        Ok(stored)
    }

    /// Copies the acting user has on loan
    pub async fn my_loans(&self, actor: &UserClaims) -> AppResult<Vec<LoanedCopy>> {
        let today = self.today();
        let loans = self.ledger.on_loan(Some(actor.user_id)).await?;
        Ok(loans.into_iter().map(|l| l.with_overdue(today)).collect())
    }

    /// Every copy on loan (librarians only)
    pub async fn all_loans(&self, actor: &UserClaims) -> AppResult<Vec<LoanedCopy>> {
        actor.require(Permission::CanMarkReturned)?;

        let today = self.today();
        let loans = self.ledger.on_loan(None).await?;
        Ok(loans.into_iter().map(|l| l.with_overdue(today)).collect())
    }
}
