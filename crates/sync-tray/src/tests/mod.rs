mod control_channel;
