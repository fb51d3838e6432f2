pub mod in_ports;
