//! Wire models for the Agent Communication Protocol (ACP) REST surface.
//!
//! Only the subset needed to run an agent synchronously and to list the agents
//! an endpoint serves is modelled here. Fields we do not read are tolerated on
//! deserialization and omitted on serialization, so the same structs are used
//! by the client and by the stub server.
pub mod agent;
pub mod message;
pub mod run;
