use crate::agent::RobotAgent;
use crate::common::Position;
use crate::map::Map;

const CELL_WIDTH: usize = 7;

/// Two boards side by side: the world (contents only when `reveal` is set) and
/// the agent's belief, with the most likely values on top and their
/// probability below.
pub fn render_board(map: &Map, agent: &RobotAgent, reveal: bool) -> String {
    let bar = "_".repeat(map.width * (CELL_WIDTH + 1) + 1);
    let mut board = String::new();

    for y in (0..map.height as i32).rev() {
        let world_top = row(map.width, |x| {
            if reveal {
                map.get((x, y)).label().to_string()
            } else {
                String::new()
            }
        });
        let world_bottom = row(map.width, |x| {
            if agent.position() == (x, y) {
                "Robot".to_string()
            } else {
                String::new()
            }
        });
        let belief_top = row(map.width, |x| cell_top(agent, (x, y)));
        let belief_bottom = row(map.width, |x| cell_bottom(agent, (x, y)));

        board.push_str(&format!("{bar}  {bar}\n"));
        board.push_str(&format!("{world_top}  {belief_top}\n"));
        board.push_str(&format!("{world_bottom}  {belief_bottom}\n"));
    }
    board.push_str(&format!("{bar}  {bar}"));
    board
}

fn row(width: usize, cell: impl Fn(i32) -> String) -> String {
    let mut line = String::from("|");
    for x in 0..width as i32 {
        line.push_str(&format!("{:>width$}|", cell(x), width = CELL_WIDTH));
    }
    line
}

fn cell_top(agent: &RobotAgent, pos: Position) -> String {
    if agent.position() == pos {
        return "Robot".to_string();
    }
    let likely = agent.most_likely(pos);
    match likely.values.as_slice() {
        [single] => single.label().to_string(),
        values => values
            .iter()
            .map(|value| value.to_char().to_string())
            .collect::<Vec<_>>()
            .join("/"),
    }
}

fn cell_bottom(agent: &RobotAgent, pos: Position) -> String {
    if agent.position() == pos {
        return String::new();
    }
    match (agent.most_likely(pos).probability * 100.0) as u32 {
        100 => " ".to_string(),
        percent => format!("{percent}%"),
    }
}
