//! # Ignition Delay Plot Module
//!
//! Assembles ignition delay time data for the conventional Arrhenius-style
//! presentation: inverse temperature abscissa (1000/T) and logarithmic
//! ordinate in microseconds. Experimental series carry a relative
//! uncertainty turned into symmetric error bars (`yerr = u * tau`);
//! simulated series are plain curves.
//!
//! Rendering goes through the terminal and gnuplot backends; the assembled
//! series can also be exported to CSV or printed as a table.
use RustedSciThe::Utils::plots::{plots_gnulot, plots_terminal};
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use std::fs::File;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiguresError {
    #[error("Series '{0}' is empty")]
    EmptySeries(String),
    #[error("Series '{0}': temperature and tau lengths differ ({1} vs {2})")]
    LengthMismatch(String, usize, usize),
    #[error("Temperatures must be positive in series '{0}'")]
    NonPositiveTemperature(String),
    #[error("Nothing to plot")]
    NoSeries,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
struct Series {
    label: String,
    /// temperature [K], stored sorted descending (ascending 1000/T)
    temperature: Vec<f64>,
    /// ignition delay time [s]
    tau: Vec<f64>,
    /// relative uncertainty; zero for simulated series
    uncertainty: f64,
    simulated: bool,
}

impl Series {
    fn new(
        label: &str,
        temperature: &[f64],
        tau: &[f64],
        uncertainty: f64,
        simulated: bool,
    ) -> Result<Self, FiguresError> {
        if temperature.is_empty() {
            return Err(FiguresError::EmptySeries(label.to_string()));
        }
        if temperature.len() != tau.len() {
            return Err(FiguresError::LengthMismatch(
                label.to_string(),
                temperature.len(),
                tau.len(),
            ));
        }
        if temperature.iter().any(|t| *t <= 0.0) {
            return Err(FiguresError::NonPositiveTemperature(label.to_string()));
        }
        let mut points: Vec<(f64, f64)> = temperature
            .iter()
            .copied()
            .zip(tau.iter().copied())
            .collect();
        points.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(Self {
            label: label.to_string(),
            temperature: points.iter().map(|(t, _)| *t).collect(),
            tau: points.iter().map(|(_, tau)| *tau).collect(),
            uncertainty,
            simulated,
        })
    }

    fn abscissa(&self) -> Vec<f64> {
        self.temperature.iter().map(|t| 1000.0 / t).collect()
    }

    /// log10 of the delay in microseconds
    fn ordinate(&self) -> Vec<f64> {
        self.tau.iter().map(|t| (t * 1e6).log10()).collect()
    }
}

/// Ignition delay time plot: experimental points and simulated curves on an
/// inverse-temperature, logarithmic-delay canvas.
#[derive(Debug, Clone, Default)]
pub struct IdtPlot {
    series: Vec<Series>,
    /// temperature axis limits [K], low to high
    t_lim: Option<(f64, f64)>,
}

impl IdtPlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds experimental ignition delay data with a relative uncertainty.
    /// Temperatures in K, delays in seconds.
    pub fn add_exp(
        &mut self,
        label: &str,
        temperature: &[f64],
        tau: &[f64],
        uncertainty: f64,
    ) -> Result<(), FiguresError> {
        self.series
            .push(Series::new(label, temperature, tau, uncertainty, false)?);
        Ok(())
    }

    /// Adds a simulated ignition delay curve.
    pub fn add_sim(
        &mut self,
        label: &str,
        temperature: &[f64],
        tau: &[f64],
    ) -> Result<(), FiguresError> {
        self.series
            .push(Series::new(label, temperature, tau, 0.0, true)?);
        Ok(())
    }

    /// Temperature axis limits [K]; stored low to high, plotted inverted.
    pub fn set_t_lim(&mut self, lim: (f64, f64)) {
        self.t_lim = Some(lim);
    }

    pub fn t_lim(&self) -> Option<(f64, f64)> {
        self.t_lim
    }

    fn clipped(&self, series: &Series) -> (Vec<f64>, Vec<f64>) {
        let (lo, hi) = self.t_lim.unwrap_or((f64::MIN_POSITIVE, f64::MAX));
        let xs = series.abscissa();
        let ys = series.ordinate();
        let mut x = Vec::new();
        let mut y = Vec::new();
        for (i, t) in series.temperature.iter().enumerate() {
            if *t >= lo && *t <= hi {
                x.push(xs[i]);
                y.push(ys[i]);
            }
        }
        (x, y)
    }

    /// Renders every series to the terminal, one canvas per series.
    pub fn render_terminal(&self) -> Result<(), FiguresError> {
        if self.series.is_empty() {
            return Err(FiguresError::NoSeries);
        }
        for series in &self.series {
            let (x, y) = self.clipped(series);
            if x.is_empty() {
                continue;
            }
            let n = x.len();
            plots_terminal(
                "1000/T [1/K]".to_string(),
                vec![format!("log10 IDT [us], {}", series.label)],
                DVector::from_vec(x),
                DMatrix::from_vec(n, 1, y),
            );
        }
        Ok(())
    }

    /// Renders every series with gnuplot.
    pub fn gnuplot(&self) -> Result<(), FiguresError> {
        if self.series.is_empty() {
            return Err(FiguresError::NoSeries);
        }
        for series in &self.series {
            let (x, y) = self.clipped(series);
            if x.is_empty() {
                continue;
            }
            let n = x.len();
            plots_gnulot(
                "1000/T [1/K]".to_owned(),
                vec![format!("log10 IDT [us], {}", series.label)],
                DVector::from_vec(x),
                DMatrix::from_vec(n, 1, y),
            );
        }
        Ok(())
    }

    /// Prints all series as a table: label, T, 1000/T, delay and error bar.
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("series"),
            Cell::new("T, K"),
            Cell::new("1000/T, 1/K"),
            Cell::new("IDT, us"),
            Cell::new("yerr, us"),
        ]));
        for series in &self.series {
            for i in 0..series.temperature.len() {
                let tau_us = series.tau[i] * 1e6;
                let yerr = series.uncertainty * tau_us;
                table.add_row(Row::new(vec![
                    Cell::new(&series.label),
                    Cell::new(&format!("{:.1}", series.temperature[i])),
                    Cell::new(&format!("{:.4}", 1000.0 / series.temperature[i])),
                    Cell::new(&format!("{:.2}", tau_us)),
                    Cell::new(&format!("{:.2}", yerr)),
                ]));
            }
        }
        table.printstd();
    }

    /// Writes all series to a CSV file.
    pub fn save_csv(&self, path: &str) -> Result<(), FiguresError> {
        if self.series.is_empty() {
            return Err(FiguresError::NoSeries);
        }
        let mut file = File::create(path)?;
        writeln!(file, "series,kind,T_K,inv_T,IDT_us,yerr_us")?;
        for series in &self.series {
            let kind = if series.simulated { "sim" } else { "exp" };
            for i in 0..series.temperature.len() {
                let tau_us = series.tau[i] * 1e6;
                writeln!(
                    file,
                    "{},{},{},{},{},{}",
                    series.label,
                    kind,
                    series.temperature[i],
                    1000.0 / series.temperature[i],
                    tau_us,
                    series.uncertainty * tau_us
                )?;
            }
        }
        info!("IDT plot data saved to '{}'", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_sorted_by_inverse_temperature() {
        let s = Series::new(
            "exp",
            &[1100.0, 1300.0, 1200.0],
            &[3e-4, 1e-4, 2e-4],
            0.1,
            false,
        )
        .unwrap();
        assert_eq!(s.temperature, vec![1300.0, 1200.0, 1100.0]);
        assert_eq!(s.tau, vec![1e-4, 2e-4, 3e-4]);
        let x = s.abscissa();
        assert!(x[0] < x[1] && x[1] < x[2]);
    }

    #[test]
    fn test_ordinate_is_log10_microseconds() {
        let s = Series::new("sim", &[1000.0], &[1e-4], 0.0, true).unwrap();
        // 1e-4 s = 100 us -> log10 = 2
        assert_relative_eq!(s.ordinate()[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut plot = IdtPlot::new();
        assert!(plot.add_exp("bad", &[1000.0, 1100.0], &[1e-4], 0.1).is_err());
        assert!(plot.add_sim("empty", &[], &[]).is_err());
    }

    #[test]
    fn test_t_lim_clipping() {
        let mut plot = IdtPlot::new();
        plot.add_sim("sim", &[1000.0, 1200.0, 1400.0], &[3e-4, 2e-4, 1e-4])
            .unwrap();
        plot.set_t_lim((1100.0, 1300.0));
        let (x, y) = plot.clipped(&plot.series[0]);
        assert_eq!(x.len(), 1);
        assert_eq!(y.len(), 1);
        assert_relative_eq!(x[0], 1000.0 / 1200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idt.csv");
        let mut plot = IdtPlot::new();
        plot.add_exp("shots", &[1200.0, 1300.0], &[2e-4, 1e-4], 0.2)
            .unwrap();
        plot.add_sim("gri30", &[1200.0, 1300.0], &[1.8e-4, 0.9e-4])
            .unwrap();
        plot.save_csv(path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("series,kind,T_K"));
        // header + 4 data rows
        assert_eq!(content.trim().lines().count(), 5);
        assert!(content.contains("shots,exp"));
        assert!(content.contains("gri30,sim"));
    }

    #[test]
    fn test_render_empty_plot_errors() {
        let plot = IdtPlot::new();
        assert!(plot.render_terminal().is_err());
    }
}
