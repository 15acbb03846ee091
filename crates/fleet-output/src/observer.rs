//! `OutputObserver<W>`: bridges `FleetObserver` to an `OutputWriter`.

use std::collections::BTreeMap;

use fleet_core::{SimTime, UserId};
use fleet_registry::Registry;
use fleet_sim::{FleetEvent, FleetObserver, RunSummary};

use crate::row::{BikeSnapshotRow, StationKind, StationSnapshotRow, TripOutcome, TripRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that assembles one [`TripRow`] per user from the event
/// stream and writes registry snapshots to any [`OutputWriter`] backend.
///
/// A trip row is written as soon as the trip arrives or aborts.  Trips still
/// underway when the run stops are written as `pending` at the end.  Trips
/// whose departure lies past the horizon never emit an event and produce no
/// row.
///
/// Errors from the writer are stored internally because `FleetObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct OutputObserver<W: OutputWriter> {
    writer:     W,
    open_trips: BTreeMap<UserId, TripRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            open_trips: BTreeMap::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn close_trip(&mut self, now: SimTime, user: UserId, close: impl FnOnce(&mut TripRow)) {
        let Some(mut row) = self.open_trips.remove(&user) else {
            log::debug!("[{now}] terminal event for untracked {user}");
            return;
        };
        row.end_ms = Some(now.0);
        close(&mut row);
        let result = self.writer.write_trips(std::slice::from_ref(&row));
        self.store_err(result);
    }
}

impl<W: OutputWriter> FleetObserver for OutputObserver<W> {
    fn on_event(&mut self, now: SimTime, event: &FleetEvent) {
        match *event {
            FleetEvent::TripDeparted { user, .. } => {
                self.open_trips.insert(user, TripRow {
                    user:          user.0,
                    outcome:       TripOutcome::Pending,
                    departure_ms:  now.0,
                    end_ms:        None,
                    bike:          None,
                    start_station: None,
                    end_station:   None,
                    abort_reason:  None,
                });
            }
            FleetEvent::BikeAssigned { user, bike, .. } => {
                if let Some(row) = self.open_trips.get_mut(&user) {
                    row.bike = Some(bike.0);
                }
            }
            FleetEvent::UnlockSucceeded { user, bike, station } => {
                if let Some(row) = self.open_trips.get_mut(&user) {
                    row.bike = Some(bike.0);
                    row.start_station = station.map(|s| s.0);
                }
            }
            FleetEvent::LockSucceeded { user, station, .. } => {
                if let Some(row) = self.open_trips.get_mut(&user) {
                    row.end_station = station.map(|s| s.0);
                }
            }
            FleetEvent::TripArrived { user, bike } => self.close_trip(now, user, |row| {
                row.outcome = TripOutcome::Completed;
                row.bike = Some(bike.0);
            }),
            FleetEvent::TripAborted { user, reason } => self.close_trip(now, user, |row| {
                row.outcome = TripOutcome::Aborted;
                row.abort_reason = Some(reason);
            }),
            _ => {}
        }
    }

    fn on_snapshot(&mut self, now: SimTime, registry: &Registry) {
        let docking = registry.stations().iter().map(|s| StationSnapshotRow {
            time_ms:    now.0,
            kind:       StationKind::Docking,
            station_id: s.id().0,
            occupants:  s.occupant_count(),
            capacity:   s.capacity(),
        });
        let charging = registry.charging_stations().iter().map(|c| StationSnapshotRow {
            time_ms:    now.0,
            kind:       StationKind::Charging,
            station_id: c.id().0,
            occupants:  c.occupant_count(),
            capacity:   c.capacity(),
        });
        let stations: Vec<StationSnapshotRow> = docking.chain(charging).collect();

        let bikes: Vec<BikeSnapshotRow> = registry
            .bikes()
            .iter()
            .map(|b| {
                let location = b.location();
                BikeSnapshotRow {
                    time_ms:          now.0,
                    bike_id:          b.id().0,
                    lat:              location.lat,
                    lon:              location.lon,
                    busy:             b.is_busy(),
                    user:             b.user().map(|u| u.0),
                    battery:          b.battery(),
                    station:          b.station().map(|s| s.0),
                    charging_station: b.charging_station().map(|c| c.0),
                }
            })
            .collect();

        if !stations.is_empty() {
            let result = self.writer.write_station_snapshots(&stations);
            self.store_err(result);
        }
        if !bikes.is_empty() {
            let result = self.writer.write_bike_snapshots(&bikes);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, now: SimTime, summary: &RunSummary) {
        let pending: Vec<TripRow> = std::mem::take(&mut self.open_trips).into_values().collect();
        if !pending.is_empty() {
            log::info!("[{now}] {} of {} trips still pending", pending.len(), summary.trips_total);
            let result = self.writer.write_trips(&pending);
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
