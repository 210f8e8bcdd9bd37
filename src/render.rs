use crate::assemble::BinLayout;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII drawing of one sheet, pieces labelled with their id.
pub fn render_bin(bin: &BinLayout) -> String {
    if bin.width <= 0.0 || bin.height <= 0.0 {
        return String::new();
    }
    let scale = f64::min(MAX_WIDTH / bin.width, MAX_HEIGHT / bin.height);
    let grid_w = (bin.width * scale).round() as usize;
    let grid_h = (bin.height * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in &bin.placements {
        let sx = (p.x * scale).round() as usize;
        let sy = (p.y * scale).round() as usize;
        let sw = (p.width * scale).round() as usize;
        let sh = (p.height * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label: Vec<char> = if p.rotated {
            format!("{}*", p.piece_id).chars().collect()
        } else {
            p.piece_id.chars().collect()
        };

        if sw > 2 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label.len() / 2);

            for (i, &ch) in label.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(current: char, line: char) -> char {
    match current {
        '+' => '+',
        '|' if line == '-' => '+',
        '-' if line == '|' => '+',
        _ => line,
    }
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = match grid.first() {
        Some(row) => row.len(),
        None => return,
    };

    for i in (x..=x + w).filter(|&i| i < cols) {
        for row in [y, y + h].into_iter().filter(|&r| r < rows) {
            grid[row][i] = edge(grid[row][i], '-');
        }
    }

    for j in (y..=y + h).filter(|&j| j < rows) {
        for col in [x, x + w].into_iter().filter(|&c| c < cols) {
            grid[j][col] = edge(grid[j][col], '|');
        }
    }

    for cx in [x, x + w] {
        for cy in [y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
