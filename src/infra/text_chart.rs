use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::app::ports::ChartSurface;
use crate::error::{Result, ScraperError};
use crate::types::BarChartSpec;

const DEFAULT_BAR_WIDTH: usize = 50;
const BAR_CHAR: char = '█';

/// Horizontal bar chart drawn as text. The first bar is printed at the top.
pub struct TextBarChart<W: Write> {
    out: W,
    bar_width: usize,
}

impl TextBarChart<Stdout> {
    /// The default display surface: the terminal.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

/// Chart output file, created on the first write. A run that never draws
/// leaves any existing file untouched.
pub struct ChartFile {
    path: PathBuf,
    file: Option<BufWriter<File>>,
}

impl ChartFile {
    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        let file = match self.file.take() {
            Some(file) => file,
            None => BufWriter::new(File::create(&self.path)?),
        };
        Ok(self.file.insert(file))
    }
}

impl Write for ChartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl TextBarChart<ChartFile> {
    pub fn to_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(ChartFile {
            path: path.as_ref().to_path_buf(),
            file: None,
        })
    }
}

impl<W: Write> TextBarChart<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Bar length for a stored metric. Values are kept as text everywhere else;
/// only the drawing needs a magnitude. Unparseable text draws no bar.
fn magnitude(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

impl<W: Write> TextBarChart<W> {
    fn render(&mut self, chart: &BarChartSpec) -> io::Result<()> {
        let label_width = chart
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .chain(std::iter::once(chart.y_label.chars().count()))
            .max()
            .unwrap_or(0);
        let max = chart
            .bars
            .iter()
            .map(|b| magnitude(&b.value))
            .fold(0.0_f64, f64::max);

        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out)?;
        writeln!(self.out, "{:<label_width$} |", chart.y_label)?;
        for bar in &chart.bars {
            let len = if max > 0.0 {
                (magnitude(&bar.value) / max * self.bar_width as f64).round() as usize
            } else {
                0
            };
            let fill: String = std::iter::repeat(BAR_CHAR).take(len).collect();
            writeln!(self.out, "{:<label_width$} | {} {}", bar.label, fill, bar.value)?;
        }
        writeln!(
            self.out,
            "{:<label_width$} +{}",
            "",
            "-".repeat(self.bar_width + 1)
        )?;
        writeln!(self.out, "{:<label_width$}   {}", "", chart.x_label)?;
        self.out.flush()
    }
}

impl<W: Write> ChartSurface for TextBarChart<W> {
    fn draw_bar_chart(&mut self, chart: &BarChartSpec) -> Result<()> {
        self.render(chart).map_err(ScraperError::Render)
    }
}
