/// Ignition delay time plots on the conventional inverse-temperature,
/// logarithmic-delay canvas, with terminal and gnuplot rendering and CSV
/// export.
pub mod idt_plot;
