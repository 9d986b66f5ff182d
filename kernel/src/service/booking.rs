use crate::event::{BookingEvent, EventPublisher};
use crate::fee;
use crate::model::booking::event::{NewBooking, ReserveBooking};
use crate::model::booking::{Booking, BookingKind, BookingStatus};
use crate::model::id::{BookingId, FacilityId};
use crate::model::slot::TimeSlot;
use crate::repository::booking::{BookingRepository, CreateOutcome, StatusUpdate};
use crate::repository::coach::CoachRateRepository;
use crate::repository::facility::FacilityRepository;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("booking must end after it starts: start={start}, end={end}")]
    InvalidSlot {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("facility {0} does not exist or is closed for booking")]
    FacilityUnavailable(FacilityId),
    #[error("facility {facility_id} already has a confirmed booking overlapping {slot}")]
    SlotConflict {
        facility_id: FacilityId,
        slot: TimeSlot,
    },
    #[error(transparent)]
    Infra(#[from] AppError),
}

#[derive(Debug, Error)]
pub enum CancelError {
    #[error("booking {0} was not found")]
    NotFound(BookingId),
    #[error("booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),
    #[error(transparent)]
    Infra(#[from] AppError),
}

/// Orchestrates booking creation and cancellation. Owns the decision to
/// create; the repositories own storage. All collaborators come in through
/// the constructor so the registry can wire real or in-memory stores.
#[derive(new)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    facilities: Arc<dyn FacilityRepository>,
    coaches: Arc<dyn CoachRateRepository>,
    events: Arc<dyn EventPublisher>,
}

impl BookingService {
    /// Validates the request, prices it, and commits it. Each check is a
    /// distinct terminal rejection; nothing is written unless all pass.
    /// The store re-checks the slot at commit, so a conflict can still
    /// surface from `create` after the early probe passed.
    pub async fn reserve(&self, cmd: ReserveBooking) -> Result<Booking, ReserveError> {
        let slot =
            TimeSlot::new(cmd.start_time, cmd.end_time).map_err(|e| ReserveError::InvalidSlot {
                start: e.start,
                end: e.end,
            })?;

        let facility = self
            .facilities
            .find_by_id(cmd.facility_id)
            .await?
            .filter(|f| f.is_open)
            .ok_or(ReserveError::FacilityUnavailable(cmd.facility_id))?;

        if self
            .bookings
            .exists_confirmed_overlap(cmd.facility_id, &slot)
            .await?
        {
            return Err(ReserveError::SlotConflict {
                facility_id: cmd.facility_id,
                slot,
            });
        }

        // A coach only belongs on a training session.
        let coach_id = match cmd.kind {
            BookingKind::Training => cmd.coach_id,
            BookingKind::FacilityOnly => None,
        };
        let coach_rate = match coach_id {
            Some(id) => self.coaches.find_hourly_rate(id).await?,
            None => None,
        };

        let fees = fee::policy_for(cmd.kind).quote(&slot, facility.hourly_rate, coach_rate);

        let new_booking = NewBooking::new(
            cmd.facility_id,
            cmd.member_id,
            coach_id,
            cmd.kind,
            slot,
            fees,
            Utc::now(),
        );

        match self.bookings.create(new_booking).await? {
            CreateOutcome::Created(booking) => {
                self.events
                    .publish(BookingEvent::Created(booking.clone()))
                    .await;
                Ok(booking)
            }
            CreateOutcome::Conflict => Err(ReserveError::SlotConflict {
                facility_id: cmd.facility_id,
                slot,
            }),
        }
    }

    /// Confirmed -> Cancelled, exactly once. A second cancel (including one
    /// racing this call) reports `AlreadyCancelled` instead of failing.
    /// Fees are left as they were written; refunds are a payment concern.
    pub async fn cancel(&self, booking_id: BookingId) -> Result<(), CancelError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(CancelError::NotFound(booking_id))?;

        if booking.status == BookingStatus::Cancelled {
            return Err(CancelError::AlreadyCancelled(booking_id));
        }

        match self
            .bookings
            .update_status(booking_id, BookingStatus::Cancelled)
            .await?
        {
            StatusUpdate::Applied => {
                self.events
                    .publish(BookingEvent::Cancelled(booking_id))
                    .await;
                Ok(())
            }
            StatusUpdate::Unchanged => Err(CancelError::AlreadyCancelled(booking_id)),
        }
    }

    /// Every booking touching the window, any status, earliest first. This
    /// is the reporting view; the conflict probe above looks at confirmed
    /// bookings only.
    pub async fn availability(
        &self,
        facility_id: FacilityId,
        slot: TimeSlot,
    ) -> AppResult<Vec<Booking>> {
        self.bookings.find_overlapping(facility_id, &slot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::facility::event::{CreateFacility, UpdateFacility};
    use crate::model::facility::Facility;
    use crate::model::id::{CoachId, MemberId};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(minutes * 60, 0).unwrap()
    }

    fn slot(start_min: i64, end_min: i64) -> TimeSlot {
        TimeSlot::new(at(start_min), at(end_min)).unwrap()
    }

    #[derive(Default)]
    struct InMemoryBookings {
        store: Mutex<Vec<Booking>>,
        create_calls: AtomicUsize,
    }

    impl InMemoryBookings {
        fn snapshot(&self) -> Vec<Booking> {
            self.store.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BookingRepository for InMemoryBookings {
        async fn create(&self, event: NewBooking) -> AppResult<CreateOutcome> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let mut store = self.store.lock().unwrap();
            // Same commit-time guard the real store enforces.
            let taken = store.iter().any(|b| {
                b.facility_id == event.facility_id
                    && b.status == BookingStatus::Confirmed
                    && b.slot.overlaps(&event.slot)
            });
            if taken {
                return Ok(CreateOutcome::Conflict);
            }
            let booking = Booking {
                booking_id: BookingId::new(),
                facility_id: event.facility_id,
                member_id: event.member_id,
                coach_id: event.coach_id,
                kind: event.kind,
                status: BookingStatus::Confirmed,
                slot: event.slot,
                fees: event.fees,
                reserved_at: event.reserved_at,
            };
            store.push(booking.clone());
            Ok(CreateOutcome::Created(booking))
        }

        async fn update_status(
            &self,
            booking_id: BookingId,
            status: BookingStatus,
        ) -> AppResult<StatusUpdate> {
            let mut store = self.store.lock().unwrap();
            match store
                .iter_mut()
                .find(|b| b.booking_id == booking_id && b.status != status)
            {
                Some(b) => {
                    b.status = status;
                    Ok(StatusUpdate::Applied)
                }
                None => Ok(StatusUpdate::Unchanged),
            }
        }

        async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
            let store = self.store.lock().unwrap();
            Ok(store.iter().find(|b| b.booking_id == booking_id).cloned())
        }

        async fn find_overlapping(
            &self,
            facility_id: FacilityId,
            slot: &TimeSlot,
        ) -> AppResult<Vec<Booking>> {
            let store = self.store.lock().unwrap();
            let mut hits: Vec<Booking> = store
                .iter()
                .filter(|b| b.facility_id == facility_id && b.slot.overlaps(slot))
                .cloned()
                .collect();
            hits.sort_by_key(|b| b.slot);
            Ok(hits)
        }

        async fn exists_confirmed_overlap(
            &self,
            facility_id: FacilityId,
            slot: &TimeSlot,
        ) -> AppResult<bool> {
            let store = self.store.lock().unwrap();
            Ok(store.iter().any(|b| {
                b.facility_id == facility_id
                    && b.status == BookingStatus::Confirmed
                    && b.slot.overlaps(slot)
            }))
        }
    }

    struct InMemoryFacilities {
        store: Vec<Facility>,
    }

    #[async_trait]
    impl FacilityRepository for InMemoryFacilities {
        async fn create(&self, _event: CreateFacility) -> AppResult<()> {
            Ok(())
        }

        async fn find_all(&self) -> AppResult<Vec<Facility>> {
            Ok(self.store.clone())
        }

        async fn find_by_id(&self, facility_id: FacilityId) -> AppResult<Option<Facility>> {
            Ok(self
                .store
                .iter()
                .find(|f| f.facility_id == facility_id)
                .cloned())
        }

        async fn update(&self, _event: UpdateFacility) -> AppResult<()> {
            Ok(())
        }
    }

    struct InMemoryCoachRates {
        rates: HashMap<CoachId, Decimal>,
    }

    #[async_trait]
    impl CoachRateRepository for InMemoryCoachRates {
        async fn find_hourly_rate(&self, coach_id: CoachId) -> AppResult<Option<Decimal>> {
            Ok(self.rates.get(&coach_id).copied())
        }
    }

    /// Delegates to the in-memory store but reports a free slot from the
    /// early probe, reproducing the window where another writer commits
    /// between the check and the insert.
    struct ProbeBlindBookings(Arc<InMemoryBookings>);

    #[async_trait]
    impl BookingRepository for ProbeBlindBookings {
        async fn create(&self, event: NewBooking) -> AppResult<CreateOutcome> {
            self.0.create(event).await
        }

        async fn update_status(
            &self,
            booking_id: BookingId,
            status: BookingStatus,
        ) -> AppResult<StatusUpdate> {
            self.0.update_status(booking_id, status).await
        }

        async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
            self.0.find_by_id(booking_id).await
        }

        async fn find_overlapping(
            &self,
            facility_id: FacilityId,
            slot: &TimeSlot,
        ) -> AppResult<Vec<Booking>> {
            self.0.find_overlapping(facility_id, slot).await
        }

        async fn exists_confirmed_overlap(
            &self,
            _facility_id: FacilityId,
            _slot: &TimeSlot,
        ) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<BookingEvent>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: BookingEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct Fixture {
        service: BookingService,
        bookings: Arc<InMemoryBookings>,
        publisher: Arc<RecordingPublisher>,
        facility_id: FacilityId,
        coach_id: CoachId,
    }

    fn fixture() -> Fixture {
        let facility_id = FacilityId::new();
        let coach_id = CoachId::new();
        let bookings = Arc::new(InMemoryBookings::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let facilities = Arc::new(InMemoryFacilities {
            store: vec![Facility {
                facility_id,
                facility_name: "Center Court".into(),
                hourly_rate: dec!(20.00),
                is_open: true,
                description: "".into(),
                address: "".into(),
            }],
        });
        let coaches = Arc::new(InMemoryCoachRates {
            rates: HashMap::from([(coach_id, dec!(10.00))]),
        });
        let service = BookingService::new(
            bookings.clone(),
            facilities,
            coaches,
            publisher.clone(),
        );
        Fixture {
            service,
            bookings,
            publisher,
            facility_id,
            coach_id,
        }
    }

    fn request(f: &Fixture, start_min: i64, end_min: i64) -> ReserveBooking {
        ReserveBooking::new(
            f.facility_id,
            MemberId::new(),
            None,
            BookingKind::FacilityOnly,
            at(start_min),
            at(end_min),
        )
    }

    #[tokio::test]
    async fn reserve_confirms_and_prices_a_free_slot() {
        let f = fixture();
        let booking = f.service.reserve(request(&f, 540, 600)).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.kind, BookingKind::FacilityOnly);
        assert_eq!(booking.fees.facility_fee, dec!(20.00));
        assert_eq!(booking.fees.total, dec!(20.00));
        assert_eq!(f.bookings.snapshot().len(), 1);

        let events = f.publisher.events.lock().unwrap();
        assert!(matches!(events.as_slice(), [BookingEvent::Created(_)]));
    }

    #[tokio::test]
    async fn rejects_a_slot_that_ends_before_it_starts_without_touching_the_store() {
        let f = fixture();
        let err = f.service.reserve(request(&f, 600, 540)).await.unwrap_err();
        assert!(matches!(err, ReserveError::InvalidSlot { .. }));

        let err = f.service.reserve(request(&f, 600, 600)).await.unwrap_err();
        assert!(matches!(err, ReserveError::InvalidSlot { .. }));

        assert_eq!(f.bookings.create_calls.load(Ordering::SeqCst), 0);
        assert!(f.bookings.snapshot().is_empty());
    }

    #[tokio::test]
    async fn rejects_an_unknown_facility() {
        let f = fixture();
        let cmd = ReserveBooking::new(
            FacilityId::new(),
            MemberId::new(),
            None,
            BookingKind::FacilityOnly,
            at(540),
            at(600),
        );
        let err = f.service.reserve(cmd).await.unwrap_err();
        assert!(matches!(err, ReserveError::FacilityUnavailable(_)));
    }

    #[tokio::test]
    async fn rejects_a_closed_facility() {
        let facility_id = FacilityId::new();
        let service = BookingService::new(
            Arc::new(InMemoryBookings::default()),
            Arc::new(InMemoryFacilities {
                store: vec![Facility {
                    facility_id,
                    facility_name: "Old Pool".into(),
                    hourly_rate: dec!(12.00),
                    is_open: false,
                    description: "".into(),
                    address: "".into(),
                }],
            }),
            Arc::new(InMemoryCoachRates {
                rates: HashMap::new(),
            }),
            Arc::new(RecordingPublisher::default()),
        );
        let cmd = ReserveBooking::new(
            facility_id,
            MemberId::new(),
            None,
            BookingKind::FacilityOnly,
            at(540),
            at(600),
        );
        let err = service.reserve(cmd).await.unwrap_err();
        assert!(matches!(err, ReserveError::FacilityUnavailable(id) if id == facility_id));
    }

    #[tokio::test]
    async fn rejects_an_overlapping_request_and_accepts_a_back_to_back_one() {
        let f = fixture();
        // [09:00, 10:00)
        f.service.reserve(request(&f, 540, 600)).await.unwrap();

        // [09:30, 10:30) collides
        let err = f.service.reserve(request(&f, 570, 630)).await.unwrap_err();
        assert!(matches!(err, ReserveError::SlotConflict { .. }));

        // [10:00, 11:00) does not
        let booking = f.service.reserve(request(&f, 600, 660)).await.unwrap();
        assert_eq!(booking.slot, slot(600, 660));
    }

    #[tokio::test]
    async fn a_cancelled_booking_frees_its_slot() {
        let f = fixture();
        let booking = f.service.reserve(request(&f, 540, 600)).await.unwrap();
        f.service.cancel(booking.booking_id).await.unwrap();

        let rebooked = f.service.reserve(request(&f, 540, 600)).await.unwrap();
        assert_ne!(rebooked.booking_id, booking.booking_id);
    }

    #[tokio::test]
    async fn conflict_detected_at_commit_is_reported_as_a_conflict() {
        let facility_id = FacilityId::new();
        let store = Arc::new(InMemoryBookings::default());
        let service = BookingService::new(
            Arc::new(ProbeBlindBookings(store.clone())),
            Arc::new(InMemoryFacilities {
                store: vec![Facility {
                    facility_id,
                    facility_name: "Center Court".into(),
                    hourly_rate: dec!(20.00),
                    is_open: true,
                    description: "".into(),
                    address: "".into(),
                }],
            }),
            Arc::new(InMemoryCoachRates {
                rates: HashMap::new(),
            }),
            Arc::new(RecordingPublisher::default()),
        );

        // The slot is taken, but the blinded probe lets the request
        // through to `create`, which must still refuse it.
        let existing = NewBooking::new(
            facility_id,
            MemberId::new(),
            None,
            BookingKind::FacilityOnly,
            slot(540, 600),
            fee::policy_for(BookingKind::FacilityOnly).quote(&slot(540, 600), dec!(20.00), None),
            Utc::now(),
        );
        store.create(existing).await.unwrap();

        let cmd = ReserveBooking::new(
            facility_id,
            MemberId::new(),
            None,
            BookingKind::FacilityOnly,
            at(570),
            at(630),
        );
        let err = service.reserve(cmd).await.unwrap_err();
        assert!(matches!(err, ReserveError::SlotConflict { .. }));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn training_with_a_rated_coach_uses_the_coach_rate() {
        let f = fixture();
        let cmd = ReserveBooking::new(
            f.facility_id,
            MemberId::new(),
            Some(f.coach_id),
            BookingKind::Training,
            at(540),
            at(660),
        );
        let booking = f.service.reserve(cmd).await.unwrap();
        assert_eq!(booking.coach_id, Some(f.coach_id));
        assert_eq!(booking.fees.facility_fee, dec!(40.00));
        assert_eq!(booking.fees.coach_fee, dec!(20.00));
        assert_eq!(booking.fees.total, dec!(60.00));
    }

    #[tokio::test]
    async fn training_with_an_unrated_coach_falls_back_to_the_surcharge() {
        let f = fixture();
        let cmd = ReserveBooking::new(
            f.facility_id,
            MemberId::new(),
            Some(CoachId::new()),
            BookingKind::Training,
            at(540),
            at(600),
        );
        let booking = f.service.reserve(cmd).await.unwrap();
        assert_eq!(booking.fees.facility_fee, dec!(20.00));
        assert_eq!(booking.fees.coach_fee, dec!(5.00));
        assert_eq!(booking.fees.total, dec!(25.00));
    }

    #[tokio::test]
    async fn a_coach_on_a_plain_facility_request_is_dropped() {
        let f = fixture();
        let cmd = ReserveBooking::new(
            f.facility_id,
            MemberId::new(),
            Some(f.coach_id),
            BookingKind::FacilityOnly,
            at(540),
            at(600),
        );
        let booking = f.service.reserve(cmd).await.unwrap();
        assert_eq!(booking.coach_id, None);
        assert_eq!(booking.fees.coach_fee, Decimal::ZERO);
    }

    #[tokio::test]
    async fn cancelling_twice_reports_already_cancelled_and_keeps_the_fees() {
        let f = fixture();
        let booking = f.service.reserve(request(&f, 540, 600)).await.unwrap();

        f.service.cancel(booking.booking_id).await.unwrap();
        let stored = f.bookings.find_by_id(booking.booking_id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert_eq!(stored.fees, booking.fees);

        let err = f.service.cancel(booking.booking_id).await.unwrap_err();
        assert!(matches!(err, CancelError::AlreadyCancelled(id) if id == booking.booking_id));

        let stored = f.bookings.find_by_id(booking.booking_id).await.unwrap().unwrap();
        assert_eq!(stored.fees, booking.fees);

        let events = f.publisher.events.lock().unwrap();
        let cancelled = events
            .iter()
            .filter(|e| matches!(e, BookingEvent::Cancelled(_)))
            .count();
        assert_eq!(cancelled, 1);
    }

    #[tokio::test]
    async fn cancelling_an_unknown_booking_reports_not_found() {
        let f = fixture();
        let missing = BookingId::new();
        let err = f.service.cancel(missing).await.unwrap_err();
        assert!(matches!(err, CancelError::NotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn availability_lists_every_status_ordered_by_start() {
        let f = fixture();
        let late = f.service.reserve(request(&f, 660, 720)).await.unwrap();
        let early = f.service.reserve(request(&f, 540, 600)).await.unwrap();
        f.service.cancel(late.booking_id).await.unwrap();

        let listed = f
            .service
            .availability(f.facility_id, slot(0, 24 * 60))
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].booking_id, early.booking_id);
        assert_eq!(listed[1].booking_id, late.booking_id);
        assert_eq!(listed[1].status, BookingStatus::Cancelled);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Any sequence of requests for one facility leaves the confirmed
        /// set pairwise non-overlapping.
        #[test]
        fn confirmed_bookings_never_overlap(
            windows in prop::collection::vec((0i64..200, 1i64..12), 1..40)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let confirmed: Vec<Booking> = rt.block_on(async {
                let f = fixture();
                for (start, len) in windows {
                    // Quarter-hour grid; rejections are expected and fine.
                    let _ = f
                        .service
                        .reserve(request(&f, start * 15, (start + len) * 15))
                        .await;
                }
                f.bookings
                    .snapshot()
                    .into_iter()
                    .filter(|b| b.status == BookingStatus::Confirmed)
                    .collect()
            });

            for (i, a) in confirmed.iter().enumerate() {
                for b in confirmed.iter().skip(i + 1) {
                    prop_assert!(
                        !a.slot.overlaps(&b.slot),
                        "confirmed bookings {} and {} overlap",
                        a.slot,
                        b.slot
                    );
                }
            }
        }
    }
}
