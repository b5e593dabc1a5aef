mod event_bus_fanout;
mod freshness;
mod rate_limiting;
mod scheduler_flow;
mod support;
