// Engine modules: frame clock, input, timers, startup gate

pub mod game_loop;
pub mod input;
pub mod startup;
pub mod timer;
