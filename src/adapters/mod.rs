//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter           | Implements       | Connects to                    |
//! |-------------------|------------------|--------------------------------|
//! | `hardware`        | HardwarePort     | embedded-hal pins / `SimPin`   |
//! | `stdio_transport` | TransportPort    | stdin / stdout line protocol   |
//! | `time`            | PeriodicTimer    | `std::time::Instant` deadline  |
//! | `wifi`            | NetworkInfoPort  | fixed simulated association    |

pub mod hardware;
pub mod stdio_transport;
pub mod time;
pub mod wifi;
