pub mod queue_times;
