//! A parsed level: the grid plus the enemy roster, not yet populated.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use combat::EnemySpec;
use dungeon::{Grid, MapLegend};
use error::GameError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub enemies: Vec<EnemySpec>,
    pub legend: MapLegend,
}

impl Level {
    /// Parse both texts; either failure aborts the whole load.
    pub fn parse(map: &str, enemies: &str, legend: &MapLegend) -> error::Result<Self> {
        let grid = Grid::parse(map, legend)?;
        let enemies = EnemySpec::parse_roster(enemies)?;
        Ok(Self {
            grid,
            enemies,
            legend: legend.clone(),
        })
    }

    pub fn load(
        map_path: impl AsRef<Path>,
        enemies_path: impl AsRef<Path>,
        legend: &MapLegend,
    ) -> error::Result<Self> {
        let map_path = map_path.as_ref();
        let enemies_path = enemies_path.as_ref();

        let grid = Grid::from_reader(BufReader::new(open(map_path)?), legend)?;
        let enemies = EnemySpec::roster_from_reader(BufReader::new(open(enemies_path)?))?;
        log::info!(
            "loaded level {} ({}x{}, {} enemies)",
            map_path.display(),
            grid.rows(),
            grid.cols(),
            enemies.len()
        );
        Ok(Self {
            grid,
            enemies,
            legend: legend.clone(),
        })
    }
}

fn open(path: &Path) -> error::Result<File> {
    File::open(path).map_err(|e| GameError::resource(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_a_resource_error() {
        let err = Level::load(
            "definitely/not/here.txt",
            "nor/here.txt",
            &MapLegend::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::ResourceError { .. }));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("map.txt");
        let enemy_path = dir.path().join("enemies.txt");
        File::create(&map_path)
            .unwrap()
            .write_all(b"#####\n#...#\n#####\n")
            .unwrap();
        File::create(&enemy_path)
            .unwrap()
            .write_all(b"rat,1,3,5,2,1,1,4\n")
            .unwrap();

        let level = Level::load(&map_path, &enemy_path, &MapLegend::default()).unwrap();
        assert_eq!(level.grid.rows(), 3);
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].name, "rat");
    }

    #[test]
    fn bad_roster_aborts_the_load() {
        let err = Level::parse("...", "rat,0,0,5,2,1,1,4\nbat,0,1", &MapLegend::default())
            .unwrap_err();
        assert!(matches!(err, GameError::ParseError { line: 2, .. }));
    }
}
