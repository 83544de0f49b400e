use crate::cities::City;
use crate::error::MalformedTourError;
use crate::optimizer::TourEvent;
use crate::tour::Tour;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<&City> for Point {
    fn from(city: &City) -> Self {
        Self {
            x: city.x,
            y: city.y,
        }
    }
}

/// Drawing surface. Nothing drawn is visible until `present`.
pub trait Canvas {
    fn clear(&mut self);
    fn draw_point(&mut self, at: Point);
    fn draw_edge(&mut self, from: Point, to: Point);
    fn present(&mut self);
}

/// A fully built display list. Building can fail; drawing cannot, so a bad
/// tour never reaches the canvas half drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub points: Vec<Point>,
    pub edges: Vec<(Point, Point)>,
}

impl Frame {
    pub fn cities(cities: &[City]) -> Self {
        Self {
            points: cities.iter().map(Point::from).collect(),
            edges: Vec::new(),
        }
    }

    /// One marker per city and one edge per consecutive pair of the walk from
    /// `start`, closing back to it: N edges for N >= 2 cities.
    pub fn tour(tour: &Tour, cities: &[City], start: usize) -> Result<Self, MalformedTourError> {
        if tour.len() != cities.len() {
            return Err(MalformedTourError::CityCountMismatch {
                tour_len: tour.len(),
                city_count: cities.len(),
            });
        }
        let order = tour.visit_order(start)?;

        let mut frame = Self::cities(cities);
        let n = order.len();
        if n >= 2 {
            frame.edges = (0..n)
                .map(|i| {
                    let a = &cities[order[i]];
                    let b = &cities[order[(i + 1) % n]];
                    (Point::from(a), Point::from(b))
                })
                .collect();
        }
        Ok(frame)
    }

    pub fn draw_on<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear();
        for &p in &self.points {
            canvas.draw_point(p);
        }
        for &(a, b) in &self.edges {
            canvas.draw_edge(a, b);
        }
        canvas.present();
    }
}

/// Draws the tour in `event`, starting the walk at city 0. On error the
/// canvas keeps its previous frame.
pub fn render_tour<C: Canvas + ?Sized>(event: &TourEvent, canvas: &mut C) -> Result<(), MalformedTourError> {
    let frame = Frame::tour(&event.tour, &event.cities, 0)?;
    frame.draw_on(canvas);
    Ok(())
}

/// Markers only, for when no tour exists yet.
pub fn render_cities<C: Canvas + ?Sized>(cities: &[City], canvas: &mut C) {
    Frame::cities(cities).draw_on(canvas);
}

const EMPTY: u8 = 0;
const TRAIL: u8 = 1;
const CITY: u8 = 2;

/// Double buffered character grid. World coordinates in
/// `[0, world_width] x [0, world_height]` are scaled onto the grid.
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    world_width: f64,
    world_height: f64,
    back: Vec<u8>,
    front: Vec<u8>,
}

impl AsciiCanvas {
    pub fn new(width: usize, height: usize, world_width: f64, world_height: f64) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        Self {
            width,
            height,
            world_width: world_width.max(f64::EPSILON),
            world_height: world_height.max(f64::EPSILON),
            back: vec![EMPTY; width * height],
            front: vec![EMPTY; width * height],
        }
    }

    /// Sized so every city fits.
    pub fn fit(width: usize, height: usize, cities: &[City]) -> Self {
        let max_x = cities.iter().map(|c| c.x).fold(1.0, f64::max);
        let max_y = cities.iter().map(|c| c.y).fold(1.0, f64::max);
        Self::new(width, height, max_x, max_y)
    }

    fn cell(&self, p: Point) -> (i64, i64) {
        let x = (p.x / self.world_width * (self.width - 1) as f64).round() as i64;
        let y = (p.y / self.world_height * (self.height - 1) as f64).round() as i64;
        (x, y)
    }

    fn plot(&mut self, x: i64, y: i64, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if self.back[idx] < value {
            self.back[idx] = value;
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.front
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|&cell| match cell {
                        CITY => 'o',
                        TRAIL => '.',
                        _ => ' ',
                    })
                    .collect()
            })
            .collect()
    }
}

impl Canvas for AsciiCanvas {
    fn clear(&mut self) {
        self.back.fill(EMPTY);
    }

    fn draw_point(&mut self, at: Point) {
        let (x, y) = self.cell(at);
        self.plot(x, y, CITY);
    }

    fn draw_edge(&mut self, from: Point, to: Point) {
        let (x1, y1) = self.cell(from);
        let (x2, y2) = self.cell(to);
        let steps = (x2 - x1).abs().max((y2 - y1).abs());
        if steps == 0 {
            return;
        }
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            let x = (x1 as f64 + t * (x2 - x1) as f64).round() as i64;
            let y = (y1 as f64 + t * (y2 - y1) as f64).round() as i64;
            self.plot(x, y, TRAIL);
        }
    }

    fn present(&mut self) {
        self.front.copy_from_slice(&self.back);
    }
}

impl fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "-".repeat(self.width);
        writeln!(f, "+{}+", border)?;
        for line in self.lines() {
            writeln!(f, "|{}|", line)?;
        }
        write!(f, "+{}+", border)
    }
}
