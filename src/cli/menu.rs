//! Menú de terminal del operador
//!
//! Seis opciones numeradas; después de cada operación se pregunta si se
//! vuelve al menú. Fin de la entrada equivale a salir.

use std::io::{BufRead, Write};

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::services::ParkingService;

enum Flow {
    AskReturn,
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    service: &'a ParkingService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a ParkingService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;

            let Some(choice) = self.prompt("Elige una opción (1-6): ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => {
                    self.show_all().await?;
                    Flow::AskReturn
                }
                "2" => match self.prompt("Ingresa el ID del vehículo: ")? {
                    Some(id) => {
                        self.show_by_id(&id).await?;
                        Flow::AskReturn
                    }
                    None => Flow::Exit,
                },
                "3" => match self.prompt("Ingresa el número de placa: ")? {
                    Some(car_number) => {
                        self.check_in(&car_number).await?;
                        Flow::AskReturn
                    }
                    None => Flow::Exit,
                },
                "4" => match self.prompt("Ingresa el ID del vehículo: ")? {
                    Some(id) => {
                        self.check_out(&id).await?;
                        Flow::AskReturn
                    }
                    None => Flow::Exit,
                },
                "5" => match self.prompt("Ingresa el ID del vehículo a eliminar: ")? {
                    Some(id) => {
                        self.delete(&id).await?;
                        Flow::AskReturn
                    }
                    None => Flow::Exit,
                },
                "6" => Flow::Exit,
                _ => {
                    writeln!(
                        self.output,
                        "{}",
                        "❌ Opción inválida. Intenta de nuevo.".bright_red()
                    )?;
                    Flow::Continue
                }
            };

            match flow {
                Flow::AskReturn => {
                    if !self.prompt_return()? {
                        break;
                    }
                }
                Flow::Continue => {}
                Flow::Exit => break,
            }
        }

        writeln!(self.output, "{}", "👋 Saliendo del sistema de parqueo.".bright_green())?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "=== Sistema de Parqueo ===".bright_blue().bold())?;
        writeln!(self.output, "1. Mostrar todos los registros")?;
        writeln!(self.output, "2. Mostrar registro por ID")?;
        writeln!(self.output, "3. Registrar entrada de vehículo")?;
        writeln!(self.output, "4. Registrar salida de vehículo")?;
        writeln!(self.output, "5. Eliminar registro por ID")?;
        writeln!(self.output, "6. Salir")?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Leer una línea sin espacios; `None` al final de la entrada
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label.bright_yellow())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_return(&mut self) -> Result<bool> {
        Ok(self
            .prompt("¿Volver al menú (y/n)? ")?
            .map(|answer| answer.eq_ignore_ascii_case("y"))
            .unwrap_or(false))
    }

    fn print_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        writeln!(self.output, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn print_error(&mut self, context: &str, error: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{}", format!("❌ {}: {}", context, error).bright_red())?;
        Ok(())
    }

    async fn show_all(&mut self) -> Result<()> {
        let result = self.service.list_all().await;
        let vehicles = match result {
            Ok(vehicles) => vehicles,
            Err(e) => return self.print_error("No se pudieron obtener los registros", e),
        };

        writeln!(self.output)?;
        writeln!(self.output, "{}", "=== Contenido de la base de datos ===".bright_cyan().bold())?;
        writeln!(self.output)?;
        if vehicles.is_empty() {
            writeln!(self.output, "(sin registros)")?;
        }
        for vehicle in &vehicles {
            self.print_json(vehicle)?;
            writeln!(self.output)?;
        }
        writeln!(self.output, "{}", "=====================================".bright_cyan())?;
        Ok(())
    }

    async fn show_by_id(&mut self, id: &str) -> Result<()> {
        let result = self.service.get(id).await;
        match result {
            Ok(vehicle) => {
                writeln!(self.output, "{}", "=== Datos del vehículo ===".bright_cyan().bold())?;
                self.print_json(&vehicle)
            }
            Err(e) => self.print_error("No se pudo obtener el registro", e),
        }
    }

    async fn check_in(&mut self, car_number: &str) -> Result<()> {
        let result = self.service.check_in(car_number).await;
        match result {
            Ok(vehicle) => {
                let message = format!(
                    "✅ Vehículo {} ingresó por {}.",
                    vehicle.car_number, vehicle.gate_in
                );
                writeln!(self.output, "{}", message.bright_green())?;
                self.print_json(&vehicle)
            }
            Err(e) => self.print_error("No se pudo registrar la entrada", e),
        }
    }

    async fn check_out(&mut self, id: &str) -> Result<()> {
        let result = self.service.check_out(id).await;
        match result {
            Ok(vehicle) => {
                let message = format!(
                    "✅ Vehículo {} salió por {}.",
                    vehicle.id,
                    vehicle.gate_out.as_deref().unwrap_or_default()
                );
                writeln!(self.output, "{}", message.bright_green())?;
                self.print_json(&vehicle)
            }
            Err(e) => self.print_error("No se pudo registrar la salida", e),
        }
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        let result = self.service.delete(id).await;
        match result {
            Ok(vehicle) => {
                let message = format!("✅ Vehículo {} eliminado.", vehicle.car_number);
                writeln!(self.output, "{}", message.bright_green())?;
                Ok(())
            }
            Err(e) => self.print_error("No se pudo eliminar el registro", e),
        }
    }
}
