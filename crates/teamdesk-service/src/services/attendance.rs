//! Attendance service
//!
//! Clock-in/out for the signed-in user. The status is derived from the
//! local hour at clock-in and derived again at clock-out, which overwrites it.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

use teamdesk_core::engine::AttendanceState;
use teamdesk_core::{AttendanceRecord, Capabilities, DomainError, UserId};

use crate::dto::{AttendanceResponse, AttendanceStateResponse};

use super::context::ServiceContext;
use super::error::{ServiceResult, StaleWrite};
use super::permission::PermissionService;

/// Attendance service
pub struct AttendanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttendanceService<'a> {
    /// Create a new AttendanceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Clock in now
    pub async fn clock_in(&self) -> ServiceResult<AttendanceResponse> {
        self.clock_in_at(Utc::now()).await
    }

    /// Clock out now
    pub async fn clock_out(&self) -> ServiceResult<Option<AttendanceResponse>> {
        self.clock_out_at(Utc::now()).await
    }

    /// Open today's record for the signed-in user
    ///
    /// Fails with `AlreadyClockedIn` while a record is open and with
    /// `AlreadyClockedOut` once today's record is closed.
    #[instrument(skip(self))]
    pub async fn clock_in_at(&self, at: DateTime<Utc>) -> ServiceResult<AttendanceResponse> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::CLOCK_ATTENDANCE)
            .await?;

        let policy = self.ctx.attendance_policy();
        let today = policy.date_of(at);
        let records = self.ctx.attendance_repo().snapshot().await?;

        match AttendanceState::of(&records, actor.id(), today) {
            AttendanceState::ClockedIn(_) => return Err(DomainError::AlreadyClockedIn.into()),
            AttendanceState::ClockedOut(_) => return Err(DomainError::AlreadyClockedOut.into()),
            AttendanceState::NoRecord => {}
        }

        let status = policy.derive_status(at);
        let record = AttendanceRecord::clock_in(
            actor.id().clone(),
            actor.name().to_string(),
            today,
            at,
            status,
        );
        let record = self.ctx.attendance_repo().create(record).await?;

        info!(user_id = %actor.id(), date = %today, status = %status, "Clocked in");
        Ok(AttendanceResponse::from(record))
    }

    /// Close today's open record, re-deriving the status from `at`
    ///
    /// `Ok(None)` when the record vanished before the write.
    #[instrument(skip(self))]
    pub async fn clock_out_at(
        &self,
        at: DateTime<Utc>,
    ) -> ServiceResult<Option<AttendanceResponse>> {
        let actor = PermissionService::new(self.ctx)
            .require_capability(Capabilities::CLOCK_ATTENDANCE)
            .await?;

        let policy = self.ctx.attendance_policy();
        let today = policy.date_of(at);
        let records = self.ctx.attendance_repo().snapshot().await?;

        let mut record = match AttendanceState::of(&records, actor.id(), today) {
            AttendanceState::ClockedIn(record) => record.clone(),
            AttendanceState::ClockedOut(_) => return Err(DomainError::AlreadyClockedOut.into()),
            AttendanceState::NoRecord => return Err(DomainError::NotClockedIn.into()),
        };

        let status = policy.derive_status(at);
        record.clock_out(at, status);
        if !self.ctx.attendance_repo().update(&record).await.or_stale()? {
            warn!(record_id = %record.id, "Attendance record vanished before clock-out");
            return Ok(None);
        }

        info!(user_id = %actor.id(), date = %today, status = %status, "Clocked out");
        Ok(Some(AttendanceResponse::from(record)))
    }

    /// Clock state of the signed-in user on the day of `at`
    #[instrument(skip(self))]
    pub async fn state_at(&self, at: DateTime<Utc>) -> ServiceResult<AttendanceStateResponse> {
        let actor = PermissionService::new(self.ctx).actor().await?;
        let today = self.ctx.attendance_policy().date_of(at);
        let records = self.ctx.attendance_repo().snapshot().await?;

        let state = AttendanceState::of(&records, actor.id(), today);
        Ok(AttendanceStateResponse {
            date: today,
            clocked_in: state.is_clocked_in(),
            record: state.record().map(AttendanceResponse::from),
        })
    }

    /// One user's records, newest day first
    pub async fn records_for(&self, user_id: &UserId) -> ServiceResult<Vec<AttendanceResponse>> {
        let records = self.ctx.attendance_repo().snapshot().await?;
        Ok(records
            .iter()
            .filter(|record| &record.user_id == user_id)
            .map(AttendanceResponse::from)
            .collect())
    }

    /// Everyone's records for one day
    pub async fn records_on(&self, date: NaiveDate) -> ServiceResult<Vec<AttendanceResponse>> {
        let records = self.ctx.attendance_repo().snapshot().await?;
        Ok(records
            .iter()
            .filter(|record| record.date == date)
            .map(AttendanceResponse::from)
            .collect())
    }
}
