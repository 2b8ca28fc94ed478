pub mod simulation_config_dto;
