use gate_shared::{PassengerId, QueueEntry};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Priority-ordered boarding queue, partitioned by flight.
///
/// Each flight keeps its own min-heap of entries. Read queries never touch heap layout:
/// ordered views are rebuilt from a copy and positions are computed by counting.
#[derive(Debug, Default)]
pub struct BoardingQueue {
    flights: HashMap<String, BinaryHeap<Reverse<QueueEntry>>>,
    members: HashMap<PassengerId, String>,
}

impl BoardingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry for `flight_number`. Returns `false` and leaves the queue untouched
    /// when the passenger already holds an entry in any flight.
    pub fn admit(&mut self, flight_number: &str, entry: QueueEntry) -> bool {
        if self.members.contains_key(&entry.passenger_id) {
            return false;
        }

        self.members
            .insert(entry.passenger_id, flight_number.to_string());
        self.flights
            .entry(flight_number.to_string())
            .or_default()
            .push(Reverse(entry));
        true
    }

    pub fn contains(&self, passenger_id: PassengerId) -> bool {
        self.members.contains_key(&passenger_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn flight_len(&self, flight_number: &str) -> usize {
        self.flights.get(flight_number).map_or(0, BinaryHeap::len)
    }

    /// Global boarding order across all flights.
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        let mut entries: Vec<QueueEntry> = self
            .flights
            .values()
            .flat_map(|heap| heap.iter().map(|Reverse(e)| *e))
            .collect();
        entries.sort_unstable();
        entries
    }

    pub fn flight_snapshot(&self, flight_number: &str) -> Vec<QueueEntry> {
        let mut entries: Vec<QueueEntry> = self
            .flights
            .get(flight_number)
            .map(|heap| heap.iter().map(|Reverse(e)| *e).collect())
            .unwrap_or_default();
        entries.sort_unstable();
        entries
    }

    /// Zero-based rank in the global order, `None` when not queued.
    pub fn position_of(&self, passenger_id: PassengerId) -> Option<usize> {
        let entry = self.entry_of(passenger_id)?;
        Some(
            self.flights
                .values()
                .map(|heap| count_ahead(heap, &entry))
                .sum(),
        )
    }

    /// Zero-based rank among the passenger's own flight.
    pub fn flight_position_of(&self, passenger_id: PassengerId) -> Option<usize> {
        let entry = self.entry_of(passenger_id)?;
        let flight = self.members.get(&passenger_id)?;
        self.flights.get(flight).map(|heap| count_ahead(heap, &entry))
    }

    /// Next passenger to board on a flight.
    pub fn peek_next(&self, flight_number: &str) -> Option<QueueEntry> {
        self.flights
            .get(flight_number)
            .and_then(|heap| heap.peek())
            .map(|Reverse(e)| *e)
    }

    pub fn pop_next(&mut self, flight_number: &str) -> Option<QueueEntry> {
        let Reverse(entry) = self.flights.get_mut(flight_number)?.pop()?;
        self.members.remove(&entry.passenger_id);
        Some(entry)
    }

    /// Remove a specific passenger's entry wherever it is queued.
    pub fn remove(&mut self, passenger_id: PassengerId) -> Option<QueueEntry> {
        let flight = self.members.remove(&passenger_id)?;
        let heap = self.flights.get_mut(&flight)?;

        let mut removed = None;
        heap.retain(|Reverse(e)| {
            if e.passenger_id == passenger_id {
                removed = Some(*e);
                false
            } else {
                true
            }
        });
        removed
    }

    fn entry_of(&self, passenger_id: PassengerId) -> Option<QueueEntry> {
        let flight = self.members.get(&passenger_id)?;
        self.flights
            .get(flight)?
            .iter()
            .map(|Reverse(e)| *e)
            .find(|e| e.passenger_id == passenger_id)
    }
}

fn count_ahead(heap: &BinaryHeap<Reverse<QueueEntry>>, entry: &QueueEntry) -> usize {
    heap.iter().filter(|Reverse(e)| e < entry).count()
}
